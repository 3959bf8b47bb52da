use image::DynamicImage;
use time::OffsetDateTime;
use tracing::{debug, info, warn};

use crate::config::ScanConfig;
use crate::detection::{DocumentDetector, quad};
use crate::error::{Result, ScanError};
use crate::models::{CapturedPage, Quad};
use crate::rectify;

/// Supplies live frames to a scan session.
///
/// `start` is the user-mediated permission boundary: it fails with
/// [`ScanError::PermissionDenied`] or [`ScanError::NoDevice`], in which
/// case the session never enters `Detecting`.
pub trait FrameSource {
    fn start(&mut self) -> Result<()>;
    fn stop(&mut self);

    /// Pull the source's current frame. Called once per detection tick and
    /// once per capture; the returned frame is owned by the caller and
    /// dropped when that operation completes.
    fn grab_frame(&mut self) -> Result<DynamicImage>;
}

/// Detection loop state. `Detecting` means the next tick is armed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectionState {
    Idle,
    Detecting,
}

/// Outcome of one detection tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The tick completed and committed a fresh candidate.
    Found,
    /// The tick completed without finding a boundary; the candidate was
    /// cleared.
    Cleared,
    /// The session was not detecting (or was stopped mid-tick); nothing
    /// was committed.
    Skipped,
    /// The tick faulted; detection halted.
    Halted,
}

/// One document-scanning session: the live-detection loop, the current
/// candidate boundary, and the list of captured pages.
///
/// Single-threaded and cooperative: the caller drives `tick` from its own
/// refresh schedule, and `capture` always observes the candidate exactly
/// as the last completed tick left it.
pub struct ScanSession<S> {
    source: S,
    detector: DocumentDetector,
    config: ScanConfig,
    state: DetectionState,
    candidate: Option<Quad>,
    pages: Vec<CapturedPage>,
}

impl<S: FrameSource> ScanSession<S> {
    pub fn new(source: S, config: ScanConfig) -> Self {
        Self {
            source,
            detector: DocumentDetector::new(config.clone()),
            config,
            state: DetectionState::Idle,
            candidate: None,
            pages: Vec::new(),
        }
    }

    pub fn state(&self) -> DetectionState {
        self.state
    }

    /// The candidate boundary as committed by the last completed tick.
    pub fn candidate(&self) -> Option<&Quad> {
        self.candidate.as_ref()
    }

    pub fn pages(&self) -> &[CapturedPage] {
        &self.pages
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Idle → Detecting. Camera faults propagate and leave the session
    /// Idle.
    pub fn start_detection(&mut self) -> Result<()> {
        self.source.start()?;
        self.state = DetectionState::Detecting;
        info!("detection started");
        Ok(())
    }

    /// Detecting → Idle. The candidate keeps its last committed value
    /// until the first completed tick of the next detecting phase.
    pub fn stop_detection(&mut self) {
        if self.state == DetectionState::Detecting {
            self.source.stop();
            self.state = DetectionState::Idle;
            info!("detection stopped");
        }
    }

    /// Run one detection tick.
    ///
    /// The state flag is the cancellation token: it is checked on entry
    /// and again before the candidate is committed, so a stop request
    /// during processing discards the in-flight result. A fault inside the
    /// tick halts detection instead of retrying.
    pub fn tick(&mut self) -> TickOutcome {
        if self.state != DetectionState::Detecting {
            return TickOutcome::Skipped;
        }

        let detected = match self.run_tick() {
            Ok(detected) => detected,
            Err(err) => {
                warn!(error = %err, "detection tick failed, halting");
                self.stop_detection();
                return TickOutcome::Halted;
            }
        };

        if self.state != DetectionState::Detecting {
            return TickOutcome::Skipped;
        }

        // The candidate is replaced wholesale, never mutated in place.
        match detected {
            Some(found) => {
                debug!(area = found.area, "candidate committed");
                self.candidate = Some(found);
                TickOutcome::Found
            }
            None => {
                self.candidate = None;
                TickOutcome::Cleared
            }
        }
    }

    fn run_tick(&mut self) -> Result<Option<Quad>> {
        // The frame is tick-scoped: dropped on every exit path below.
        let frame = self.source.grab_frame()?;
        Ok(self.detector.detect(&frame))
    }

    /// Capture one page from the source's current frame.
    ///
    /// Reads the candidate as committed by the last completed tick and does
    /// not change detection state. Never fails on detection grounds: a
    /// missing candidate, or one the transform solver rejects as
    /// degenerate, both take the center-crop fallback. Frame acquisition
    /// faults do propagate, since a capture with no frame has nothing to
    /// fall back on.
    pub fn capture(&mut self) -> Result<&CapturedPage> {
        let frame = self.source.grab_frame()?;

        let (image, rectified) = match &self.candidate {
            Some(candidate) => {
                let corners = quad::order_corners(candidate);
                match rectify::rectify(&frame, &corners) {
                    Some(image) => (image, true),
                    None => {
                        warn!("degenerate candidate, falling back to center crop");
                        (rectify::fallback_crop(&frame, &self.config), false)
                    }
                }
            }
            None => (rectify::fallback_crop(&frame, &self.config), false),
        };

        let page = CapturedPage {
            index: self.pages.len(),
            image,
            rectified,
            captured_at: OffsetDateTime::now_utc(),
        };
        info!(index = page.index, rectified, "page captured");
        self.pages.push(page);

        Ok(self.pages.last().expect("page was just appended"))
    }

    /// Stop detection and hand back the ordered page list.
    pub fn finish(&mut self) -> &[CapturedPage] {
        self.stop_detection();
        &self.pages
    }

    /// Consume the session, yielding the ordered page list for assembly.
    pub fn into_pages(mut self) -> Vec<CapturedPage> {
        self.stop_detection();
        self.pages
    }

    /// Discard all captured pages and the current candidate, stopping
    /// detection if it was running.
    pub fn reset(&mut self) {
        self.stop_detection();
        self.pages.clear();
        self.candidate = None;
        info!("session reset");
    }
}

/// Replays a fixed list of pre-decoded frames.
///
/// Stands in for a live camera in the CLI and in tests. `grab_frame`
/// serves the current frame without advancing, the way a camera keeps
/// showing the same scene; [`advance`](Self::advance) moves to the next
/// frame and the last frame repeats once the list is exhausted. An empty
/// list behaves like a machine with no camera attached.
pub struct ImageSequenceSource {
    frames: Vec<DynamicImage>,
    cursor: usize,
    live: bool,
}

impl ImageSequenceSource {
    pub fn new(frames: Vec<DynamicImage>) -> Self {
        Self {
            frames,
            cursor: 0,
            live: false,
        }
    }

    /// Move on to the next frame, staying on the last one at the end.
    pub fn advance(&mut self) {
        if self.cursor + 1 < self.frames.len() {
            self.cursor += 1;
        }
    }
}

impl FrameSource for ImageSequenceSource {
    fn start(&mut self) -> Result<()> {
        if self.frames.is_empty() {
            return Err(ScanError::NoDevice);
        }
        self.live = true;
        Ok(())
    }

    fn stop(&mut self) {
        self.live = false;
    }

    fn grab_frame(&mut self) -> Result<DynamicImage> {
        if !self.live {
            return Err(ScanError::Frame("source is stopped".into()));
        }
        Ok(self.frames[self.cursor].clone())
    }
}
