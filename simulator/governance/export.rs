//! CSV export of the per-step records

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use gn_rust::SimulationResult;

/// One row per step
pub fn export_model_records<P: AsRef<Path>>(
    result: &SimulationResult,
    path: P,
) -> std::io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);

    writeln!(
        writer,
        "step,density,average_clustering,edge_count,successful_projects,largest_component_size,average_path_length,resource_gini,node_count,links_formed,forum_held,opportunity_degree"
    )?;
    for r in &result.model_records {
        writeln!(
            writer,
            "{},{},{},{},{},{},{},{},{},{},{},{}",
            r.step,
            r.density,
            r.average_clustering,
            r.edge_count,
            r.successful_projects,
            r.largest_component_size,
            r.average_path_length,
            r.resource_gini,
            r.node_count,
            r.links_formed,
            r.forum_held,
            r.opportunity_degree
        )?;
    }

    writer.flush()
}

/// One row per live actor per step
pub fn export_actor_records<P: AsRef<Path>>(
    result: &SimulationResult,
    path: P,
) -> std::io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);

    writeln!(writer, "step,actor_id,agent_type,resources,commitment,degree")?;
    for r in &result.actor_records {
        writeln!(
            writer,
            "{},{},{},{},{},{}",
            r.step, r.actor_id, r.agent_type, r.resources, r.commitment, r.degree
        )?;
    }

    writer.flush()
}
