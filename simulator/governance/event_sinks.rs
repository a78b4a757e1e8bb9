//! Various event sinks for different use cases

use std::cell::RefCell;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::rc::Rc;

use gn_rust::{EventSink, SimEvent, Step, StepPhase};

// ============================================================================
// Console Logging Sink
// ============================================================================

/// Prints events to the console, one line each
pub struct ConsoleEventSink {
    enabled: bool,
}

impl ConsoleEventSink {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }
}

impl EventSink for ConsoleEventSink {
    fn log(&mut self, step: Step, event: SimEvent) {
        if !self.enabled {
            return;
        }

        match event {
            SimEvent::PhaseStarted(_) => {}
            SimEvent::ForumConvened {
                convener,
                attendees,
            } => {
                println!(
                    "{:>5} ForumConvened     convener:{} attendees:{}",
                    step, convener, attendees
                );
            }
            SimEvent::LinkFormed {
                from,
                to,
                probability,
            } => {
                println!(
                    "{:>5} LinkFormed        {} -> {} p:{:.3}",
                    step, from, to, probability
                );
            }
            SimEvent::ProjectProposed {
                a,
                b,
                strength,
                joint_resources,
            } => {
                println!(
                    "{:>5} ProjectProposed   {} + {} tie:{:.3} joint:{:.1}",
                    step, a, b, strength, joint_resources
                );
            }
            SimEvent::ProjectCompleted { a, b } => {
                println!("{:>5} ProjectCompleted  {} + {}", step, a, b);
            }
            SimEvent::OpportunityLinked {
                actor,
                node,
                strength,
            } => {
                println!(
                    "{:>5} OpportunityLink   {} -> {} s:{:.3}",
                    step, actor, node, strength
                );
            }
            SimEvent::ActorRemoved {
                actor,
                edges_removed,
            } => {
                println!(
                    "{:>5} ActorRemoved      {} edges:{} ✗",
                    step, actor, edges_removed
                );
            }
            SimEvent::OpportunityInjected { node, resources } => {
                println!(
                    "{:>5} Opportunity       node:{} resources:{:.0} ✓",
                    step, node, resources
                );
            }
        }
    }
}

// ============================================================================
// CSV Event Sink
// ============================================================================

/// CSV event sink for structured data export
pub struct CsvEventSink {
    writer: BufWriter<File>,
}

impl CsvEventSink {
    pub fn new<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);

        writeln!(writer, "step,event_type,actor,related,value1,value2")?;

        Ok(Self { writer })
    }

    pub fn flush(&mut self) -> std::io::Result<()> {
        self.writer.flush()
    }
}

impl EventSink for CsvEventSink {
    fn log(&mut self, step: Step, event: SimEvent) {
        let result = match event {
            // phase markers carry no data worth a row
            SimEvent::PhaseStarted(_) => Ok(()),
            SimEvent::ForumConvened {
                convener,
                attendees,
            } => writeln!(
                self.writer,
                "{},ForumConvened,{},0,{},0",
                step, convener, attendees
            ),
            SimEvent::LinkFormed {
                from,
                to,
                probability,
            } => writeln!(
                self.writer,
                "{},LinkFormed,{},{},{},0",
                step, from, to, probability
            ),
            SimEvent::ProjectProposed {
                a,
                b,
                strength,
                joint_resources,
            } => writeln!(
                self.writer,
                "{},ProjectProposed,{},{},{},{}",
                step, a, b, strength, joint_resources
            ),
            SimEvent::ProjectCompleted { a, b } => {
                writeln!(self.writer, "{},ProjectCompleted,{},{},0,0", step, a, b)
            }
            SimEvent::OpportunityLinked {
                actor,
                node,
                strength,
            } => writeln!(
                self.writer,
                "{},OpportunityLinked,{},{},{},0",
                step, actor, node, strength
            ),
            SimEvent::ActorRemoved {
                actor,
                edges_removed,
            } => writeln!(
                self.writer,
                "{},ActorRemoved,{},0,{},0",
                step, actor, edges_removed
            ),
            SimEvent::OpportunityInjected { node, resources } => writeln!(
                self.writer,
                "{},OpportunityInjected,{},0,{},0",
                step, node, resources
            ),
        };

        if let Err(e) = result {
            eprintln!("Error writing to CSV: {}", e);
        }
    }
}

impl Drop for CsvEventSink {
    fn drop(&mut self) {
        let _ = self.writer.flush();
    }
}

// ============================================================================
// Collector Event Sink (In-Memory)
// ============================================================================

/// Collects events in memory for programmatic analysis
pub struct CollectorEventSink {
    pub events: Vec<EventRecord>,
}

#[derive(Debug, Clone)]
pub struct EventRecord {
    pub step: Step,
    pub event: SimEvent,
}

impl CollectorEventSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn removals(&self) -> impl Iterator<Item = &EventRecord> {
        self.events
            .iter()
            .filter(|e| matches!(e.event, SimEvent::ActorRemoved { .. }))
    }

    /// Phase markers of one step, in the order they were emitted
    pub fn phases_of(&self, step: Step) -> Vec<StepPhase> {
        self.events
            .iter()
            .filter(|e| e.step == step)
            .filter_map(|e| match e.event {
                SimEvent::PhaseStarted(phase) => Some(phase),
                _ => None,
            })
            .collect()
    }

    pub fn count_by_type(&self) -> EventTypeCounts {
        let mut counts = EventTypeCounts::default();
        for record in &self.events {
            match record.event {
                SimEvent::PhaseStarted(_) => {}
                SimEvent::ForumConvened { .. } => counts.forums += 1,
                SimEvent::LinkFormed { .. } => counts.links_formed += 1,
                SimEvent::ProjectProposed { .. } => counts.projects_proposed += 1,
                SimEvent::ProjectCompleted { .. } => counts.projects_completed += 1,
                SimEvent::OpportunityLinked { .. } => counts.opportunity_links += 1,
                SimEvent::ActorRemoved { .. } | SimEvent::OpportunityInjected { .. } => {
                    counts.interventions += 1
                }
            }
        }
        counts
    }
}

#[derive(Debug, Default)]
pub struct EventTypeCounts {
    pub forums: usize,
    pub links_formed: usize,
    pub projects_proposed: usize,
    pub projects_completed: usize,
    pub opportunity_links: usize,
    pub interventions: usize,
}

impl EventSink for CollectorEventSink {
    fn log(&mut self, step: Step, event: SimEvent) {
        self.events.push(EventRecord { step, event });
    }
}

// ============================================================================
// Multi Sink (Combine Multiple Sinks)
// ============================================================================

/// Combines multiple event sinks
pub struct MultiEventSink {
    sinks: Vec<Box<dyn EventSink>>,
}

impl MultiEventSink {
    pub fn new() -> Self {
        Self { sinks: Vec::new() }
    }

    pub fn add_sink(&mut self, sink: Box<dyn EventSink>) {
        self.sinks.push(sink);
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl EventSink for MultiEventSink {
    fn log(&mut self, step: Step, event: SimEvent) {
        for sink in &mut self.sinks {
            sink.log(step, event.clone());
        }
    }
}

// ============================================================================
// Shared Sink
// ============================================================================

/// Lets the caller keep a handle on a sink the engine owns
pub struct SharedSink<T: EventSink>(pub Rc<RefCell<T>>);

impl<T: EventSink> SharedSink<T> {
    pub fn new(sink: T) -> (Self, Rc<RefCell<T>>) {
        let shared = Rc::new(RefCell::new(sink));
        (Self(shared.clone()), shared)
    }
}

impl<T: EventSink> EventSink for SharedSink<T> {
    fn log(&mut self, step: Step, event: SimEvent) {
        self.0.borrow_mut().log(step, event);
    }
}
