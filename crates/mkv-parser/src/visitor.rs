use std::marker::PhantomData;

use mkv_types::matroska::{CLUSTER, SIMPLE_BLOCK, TIMECODE};
use mkv_types::{Frame, TypeError};

use crate::element::{DataElement, EndContainer, StartContainer};
use crate::metadata::ElementMetadata;

/// Consumer of reader elements, one method per element kind.
///
/// Driven by [`StreamingMkvReader::apply`](crate::StreamingMkvReader::apply)
/// or by calling [`MkvElement::accept`](crate::MkvElement::accept) on
/// pulled elements. An error from any method stops `apply` and is handed
/// back to its caller; the reader itself stays usable.
pub trait MkvElementVisitor {
    type Error;

    fn visit_start(&mut self, element: &StartContainer) -> Result<(), Self::Error>;

    fn visit_end(&mut self, element: &EndContainer) -> Result<(), Self::Error>;

    fn visit_data(&mut self, element: &DataElement<'_>) -> Result<(), Self::Error>;

    /// Once true, `apply` stops pulling elements.
    fn is_done(&self) -> bool {
        false
    }
}

/// Fans each element out to several visitors, in order.
///
/// Visitors that report [`is_done`](MkvElementVisitor::is_done) are
/// skipped; the composite is done when all of them are.
pub struct CompositeVisitor<'v, E> {
    children: Vec<&'v mut dyn MkvElementVisitor<Error = E>>,
}

impl<E> Default for CompositeVisitor<'_, E> {
    fn default() -> Self {
        Self { children: Vec::new() }
    }
}

impl<'v, E> CompositeVisitor<'v, E> {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, visitor: &'v mut dyn MkvElementVisitor<Error = E>) -> Self {
        self.children.push(visitor);
        self
    }

    pub fn push(&mut self, visitor: &'v mut dyn MkvElementVisitor<Error = E>) {
        self.children.push(visitor);
    }

    fn each(
        &mut self,
        mut f: impl FnMut(&mut dyn MkvElementVisitor<Error = E>) -> Result<(), E>,
    ) -> Result<(), E> {
        for child in &mut self.children {
            if !child.is_done() {
                f(&mut **child)?;
            }
        }
        Ok(())
    }
}

impl<E> MkvElementVisitor for CompositeVisitor<'_, E> {
    type Error = E;

    fn visit_start(&mut self, element: &StartContainer) -> Result<(), E> {
        self.each(|v| v.visit_start(element))
    }

    fn visit_end(&mut self, element: &EndContainer) -> Result<(), E> {
        self.each(|v| v.visit_end(element))
    }

    fn visit_data(&mut self, element: &DataElement<'_>) -> Result<(), E> {
        self.each(|v| v.visit_data(element))
    }

    fn is_done(&self) -> bool {
        self.children.iter().all(|v| v.is_done())
    }
}

/// A SimpleBlock frame together with its cluster context.
#[derive(Debug)]
pub struct FrameEvent<'a> {
    pub frame: Frame<'a>,
    /// Timecode of the enclosing cluster, if it was seen before the block.
    pub cluster_timecode: Option<u64>,
    pub metadata: ElementMetadata,
}

impl FrameEvent<'_> {
    /// Cluster timecode plus the block's relative timecode, in timecode
    /// scale units.
    pub fn absolute_timecode(&self) -> Option<i64> {
        let cluster = i64::try_from(self.cluster_timecode?).ok()?;
        cluster.checked_add(i64::from(self.frame.time_code))
    }
}

/// Calls a closure for every SimpleBlock frame, optionally for one track.
///
/// ```text
///   Cluster start   → forget the previous cluster timecode
///   Timecode        → remember it
///   SimpleBlock     → parse the frame, call on_frame
/// ```
///
/// Frame parse failures are converted into the closure's error type.
pub struct FrameVisitor<F, E> {
    on_frame: F,
    track: Option<u64>,
    cluster_timecode: Option<u64>,
    frames: u64,
    _error: PhantomData<fn() -> E>,
}

impl<F, E> FrameVisitor<F, E>
where
    F: FnMut(FrameEvent<'_>) -> Result<(), E>,
    E: From<TypeError>,
{
    pub fn new(on_frame: F) -> Self {
        Self {
            on_frame,
            track: None,
            cluster_timecode: None,
            frames: 0,
            _error: PhantomData,
        }
    }

    /// Only report frames of `track`.
    #[must_use]
    pub fn track(mut self, track: u64) -> Self {
        self.track = Some(track);
        self
    }

    /// Frames handed to the closure so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl<F, E> MkvElementVisitor for FrameVisitor<F, E>
where
    F: FnMut(FrameEvent<'_>) -> Result<(), E>,
    E: From<TypeError>,
{
    type Error = E;

    fn visit_start(&mut self, element: &StartContainer) -> Result<(), E> {
        if element.metadata.id() == CLUSTER {
            self.cluster_timecode = None;
        }
        Ok(())
    }

    fn visit_end(&mut self, element: &EndContainer) -> Result<(), E> {
        if element.metadata.id() == CLUSTER {
            self.cluster_timecode = None;
        }
        Ok(())
    }

    fn visit_data(&mut self, element: &DataElement<'_>) -> Result<(), E> {
        match element.metadata.id() {
            TIMECODE => {
                self.cluster_timecode = element.value()?.as_u64();
                Ok(())
            }
            SIMPLE_BLOCK => {
                let Some(frame) = element.frame()? else {
                    return Ok(());
                };
                if self.track.is_some_and(|t| t != frame.track_number) {
                    return Ok(());
                }
                self.frames += 1;
                (self.on_frame)(FrameEvent {
                    frame,
                    cluster_timecode: self.cluster_timecode,
                    metadata: element.metadata,
                })
            }
            _ => Ok(()),
        }
    }
}
