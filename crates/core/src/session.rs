use crate::{
    measure::{ElevationMeasurer, Measurement, RulerPath, SegmentMeasurer},
    Cells, Point2, RulerConfig,
};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// Whether a session is currently measuring anything
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// No measurement in progress
    Idle,
    /// The user is dragging out a path
    Active,
}

/// How the most recent measurement ended
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// The path was accepted, e.g. a token was moved along it
    Committed,
    /// The path was thrown away
    Cancelled,
}

/// A path that was accepted at the end of a measurement. The host uses this
/// to actually move something along the path.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CommittedPath {
    /// Every point along the path, including the final destination
    pub points: Vec<Point2>,
    /// Elevation change to reach each point, parallel to `points`
    pub increments: Vec<Cells>,
    /// Net elevation change over the whole path. Unlike
    /// [Measurement::total_elevation], this includes legs too short to be
    /// displayed, e.g. climbing straight up on the spot, since the token
    /// still ends up at that elevation.
    pub total_elevation: Cells,
}

/// All the state for one ruler's in-progress measurement: the waypoints that
/// have been placed so far, how much elevation changes to reach each of them,
/// and the elevation change that's queued up for the next one.
///
/// A session starts out [Idle](SessionState::Idle). [Self::start] begins a
/// measurement, waypoints get added and removed, then the measurement is
/// either committed or cancelled, which returns the session to idle. Sessions
/// are reusable, and any number of measurements can happen one after
/// another.
///
/// Anything that changes the path is ignored while the session is idle.
///
/// ## Invariants
/// - There is exactly one elevation increment per waypoint
/// - The first waypoint is where the path starts, so it never has an
///   elevation change
#[derive(Clone, Debug)]
pub struct MeasurementSession {
    state: SessionState,
    waypoints: Vec<Point2>,
    increments: Vec<Cells>,
    /// Elevation change for the destination, which hasn't been placed yet
    pending: Cells,
    /// Most recent cursor position
    destination: Option<Point2>,
    last_termination: Option<Termination>,
}

impl MeasurementSession {
    pub fn new() -> Self {
        Self {
            state: SessionState::Idle,
            waypoints: Vec::new(),
            increments: Vec::new(),
            pending: Cells::ZERO,
            destination: None,
            last_termination: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == SessionState::Active
    }

    pub fn waypoints(&self) -> &[Point2] {
        &self.waypoints
    }

    pub fn increments(&self) -> &[Cells] {
        &self.increments
    }

    /// Elevation change queued up for the next waypoint
    pub fn pending(&self) -> Cells {
        self.pending
    }

    pub fn destination(&self) -> Option<Point2> {
        self.destination
    }

    /// How the previous measurement ended. `None` if there hasn't been one
    /// yet, or a new one has since started.
    pub fn last_termination(&self) -> Option<Termination> {
        self.last_termination
    }

    /// Start a new measurement at the given point. Any measurement already in
    /// progress is thrown away.
    pub fn start(&mut self, origin: Point2) {
        debug!("Starting measurement at {}", origin);
        self.reset();
        self.last_termination = None;
        self.state = SessionState::Active;
        // The pending increment was just reset, so the origin gets 0
        self.add_waypoint(origin);
    }

    /// Place a waypoint. The queued elevation change gets attached to it, and
    /// the queue is reset for the next one.
    pub fn add_waypoint(&mut self, point: Point2) {
        if !self.is_active() {
            debug!("Ignoring waypoint {}, no measurement in progress", point);
            return;
        }

        // The origin is where the path starts, so it can't change elevation
        let increment = if self.waypoints.is_empty() {
            Cells::ZERO
        } else {
            self.pending
        };
        debug!("Adding waypoint {} with elevation {}", point, increment);
        self.waypoints.push(point);
        self.increments.push(increment);
        self.pending = Cells::ZERO;
    }

    /// Remove the most recently placed waypoint, along with its elevation
    /// change. The origin is never removed, so this does nothing if the
    /// origin is the only waypoint left.
    pub fn remove_waypoint(&mut self) {
        if !self.is_active() {
            debug!("Ignoring waypoint removal, no measurement in progress");
            return;
        }
        if self.waypoints.len() <= 1 {
            warn!("Ignoring waypoint removal, only the origin is left");
            return;
        }

        if let (Some(point), Some(_)) =
            (self.waypoints.pop(), self.increments.pop())
        {
            debug!("Removed waypoint {}", point);
            self.pending = Cells::ZERO;
        }
    }

    /// Change the elevation queued up for the destination
    pub fn adjust_pending(&mut self, delta: Cells) {
        if !self.is_active() {
            debug!("Ignoring elevation change, no measurement in progress");
            return;
        }

        self.pending += delta;
        debug!("Pending elevation is now {}", self.pending);
    }

    /// Queue up one more cell of climbing
    pub fn raise(&mut self) {
        self.adjust_pending(Cells::ONE);
    }

    /// Queue up one more cell of descending
    pub fn lower(&mut self) {
        self.adjust_pending(-Cells::ONE);
    }

    /// Record the current cursor position
    pub fn set_destination(&mut self, destination: Point2) {
        if self.is_active() {
            self.destination = Some(destination);
        }
    }

    /// Get the path that this session currently describes, ending at the
    /// given destination.
    pub fn path(&self, destination: Point2) -> anyhow::Result<RulerPath<'_>> {
        RulerPath::new(
            &self.waypoints,
            &self.increments,
            destination,
            self.pending,
        )
    }

    /// Measure the path from the origin through all waypoints to the given
    /// destination. The destination is remembered for [Self::commit]. Returns
    /// `None` if there's no measurement in progress.
    pub fn measure<M: SegmentMeasurer + ?Sized>(
        &mut self,
        destination: Point2,
        config: &RulerConfig,
        native: &M,
        grid_spaces: bool,
    ) -> anyhow::Result<Option<Measurement>> {
        if !self.is_active() {
            return Ok(None);
        }

        self.destination = Some(destination);
        let path = self.path(destination)?;
        let measurement = ElevationMeasurer::new(config, native)?
            .measure(&path, grid_spaces)?;
        Ok(Some(measurement))
    }

    /// Accept the current path and end the measurement. The path ends at the
    /// most recent destination, or the last waypoint if no destination has
    /// been given. Returns `None` if there's no measurement in progress.
    pub fn commit(&mut self) -> Option<CommittedPath> {
        if !self.is_active() {
            debug!("Ignoring commit, no measurement in progress");
            return None;
        }

        let mut points = self.waypoints.clone();
        let mut increments = self.increments.clone();
        if let Some(destination) = self.destination {
            points.push(destination);
            increments.push(self.pending);
        }
        let total_elevation = increments.iter().copied().sum();
        let path = CommittedPath {
            points,
            increments,
            total_elevation,
        };

        debug!("Committed measurement {:?}", path);
        self.terminate(Termination::Committed);
        Some(path)
    }

    /// Throw away the current path and end the measurement
    pub fn cancel(&mut self) {
        if self.is_active() {
            debug!("Cancelled measurement");
            self.terminate(Termination::Cancelled);
        }
    }

    /// Forget everything and go idle, without recording how the measurement
    /// ended
    pub fn clear(&mut self) {
        self.reset();
        self.last_termination = None;
    }

    fn terminate(&mut self, termination: Termination) {
        self.reset();
        self.last_termination = Some(termination);
    }

    fn reset(&mut self) {
        self.state = SessionState::Idle;
        self.waypoints.clear();
        self.increments.clear();
        self.pending = Cells::ZERO;
        self.destination = None;
    }
}

impl Default for MeasurementSession {
    fn default() -> Self {
        Self::new()
    }
}
