use crate::error::RouteError;
use crate::options::SearchOptions;
use crate::segment::{RouteStep, Segment};
use crate::session::{self, SessionError, SessionRecord, SessionStore};
use starroute_graph::{StarGraph, SystemId};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Receives the destination of every segment whose path changed during
/// [`Route::rebuild_current_route`].
pub trait RouteObserver {
    fn segment_changed(&mut self, destination: SystemId);
}

impl<F> RouteObserver for F
where
    F: FnMut(SystemId),
{
    fn segment_changed(&mut self, destination: SystemId) {
        self(destination)
    }
}

struct AttachedSession {
    store: Box<dyn SessionStore>,
    key: String,
}

/// A start system plus an ordered list of waypoints, each leg solved by
/// its own [`Segment`].
///
/// `segments[i]` always spans `start → waypoints[0]` for `i == 0` and
/// `waypoints[i-1] → waypoints[i]` otherwise. Every edit is staged on a
/// copy and committed only when all legs can be routed.
pub struct Route {
    graph: Arc<StarGraph>,
    options: SearchOptions,
    start: Option<SystemId>,
    waypoints: Vec<SystemId>,
    segments: Vec<Segment>,
    last_error: Option<RouteError>,
    observer: Option<Box<dyn RouteObserver>>,
    session: Option<AttachedSession>,
}

#[derive(Clone)]
struct Staged {
    start: Option<SystemId>,
    waypoints: Vec<SystemId>,
    segments: Vec<Segment>,
}

/// Where a system sits relative to the committed segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Location {
    /// Route start or final destination.
    Endpoint,
    /// End of segment `i` and start of segment `i + 1`.
    Boundary(usize),
    /// Strictly inside the path of segment `i`.
    Interior(usize),
    /// Inside more than one segment.
    Ambiguous,
    Absent,
}

impl Route {
    pub fn new(graph: Arc<StarGraph>, options: SearchOptions) -> Self {
        Self {
            graph,
            options,
            start: None,
            waypoints: Vec::new(),
            segments: Vec::new(),
            last_error: None,
            observer: None,
            session: None,
        }
    }

    /// Build a route and solve it immediately. A failure is kept in
    /// [`Route::last_error`] and leaves the route empty.
    pub fn with_waypoints(
        graph: Arc<StarGraph>,
        options: SearchOptions,
        start: SystemId,
        waypoints: Vec<SystemId>,
    ) -> Self {
        let mut route = Self::new(graph, options);
        let _ = route.set_route(Some(start), waypoints);
        route
    }

    pub fn graph(&self) -> &Arc<StarGraph> {
        &self.graph
    }

    pub fn options(&self) -> SearchOptions {
        self.options
    }

    pub fn start(&self) -> Option<SystemId> {
        self.start
    }

    pub fn waypoints(&self) -> &[SystemId] {
        &self.waypoints
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// The final waypoint.
    pub fn destination(&self) -> Option<SystemId> {
        self.waypoints.last().copied()
    }

    pub fn last_error(&self) -> Option<&RouteError> {
        self.last_error.as_ref()
    }

    pub fn set_observer(&mut self, observer: Box<dyn RouteObserver>) {
        self.observer = Some(observer);
    }

    /// Persist the route to `store` under `key` after every committed edit.
    pub fn attach_session(&mut self, store: Box<dyn SessionStore>, key: impl Into<String>) {
        self.session = Some(AttachedSession {
            store,
            key: key.into(),
        });
    }

    pub fn session_record(&self) -> SessionRecord {
        SessionRecord {
            start: self.start,
            waypoints: self.waypoints.clone(),
        }
    }

    /// Write the route to the attached store. Without one this does nothing.
    pub fn store_to_session(&mut self) -> Result<(), SessionError> {
        let record = self.session_record();
        match self.session.as_mut() {
            Some(attached) => session::save_record(attached.store.as_mut(), &attached.key, &record),
            None => Ok(()),
        }
    }

    /// Load the route from the attached store, resolving ids against the
    /// route's graph.
    pub fn restore_from_session(&mut self) -> Result<bool, SessionError> {
        let Some(attached) = self.session.take() else {
            return Ok(false);
        };
        let graph = Arc::clone(&self.graph);
        let result =
            session::restore_from_session(self, attached.store.as_ref(), &attached.key, &*graph);
        self.session = Some(attached);
        if let Ok(true) = result {
            info!(route = %self, "route restored from session");
        }
        result
    }

    /// Replace start and waypoints wholesale. Ids unknown to the graph are
    /// discarded; an unknown or missing start empties the route. A system
    /// may appear only once across start and waypoints.
    pub fn set_route(
        &mut self,
        start: Option<SystemId>,
        waypoints: Vec<SystemId>,
    ) -> Result<(), RouteError> {
        let start = start.filter(|id| {
            let known = self.graph.contains(*id);
            if !known {
                warn!(system = %id, "ignoring unknown start system");
            }
            known
        });
        let waypoints = match start {
            Some(_) => waypoints
                .into_iter()
                .filter(|id| {
                    let known = self.graph.contains(*id);
                    if !known {
                        warn!(system = %id, "ignoring unknown waypoint");
                    }
                    known
                })
                .collect(),
            None => Vec::new(),
        };

        let mut seen = std::collections::HashSet::new();
        if let Some(duplicate) = start
            .iter()
            .chain(waypoints.iter())
            .find(|id| !seen.insert(**id))
        {
            return Err(self.reject("set route", *duplicate, "system appears more than once"));
        }

        let staged = Staged {
            start,
            waypoints,
            segments: self.segments.clone(),
        };
        self.sync(staged)
    }

    /// Forget everything, including the stored session record.
    pub fn clear(&mut self) {
        self.start = None;
        self.waypoints.clear();
        self.segments.clear();
        self.last_error = None;
        if let Some(attached) = self.session.as_mut() {
            if let Err(e) = attached.store.remove(&attached.key) {
                warn!(error = %e, "failed to remove stored route");
            }
        }
        debug!("route cleared");
    }

    /// Store new search options on the route and every segment. Nothing is
    /// recomputed until [`Route::rebuild_current_route`] or
    /// [`Route::current_route`].
    pub fn set_search_options(&mut self, options: SearchOptions) {
        self.options = options;
        for segment in &mut self.segments {
            segment.set_options(options);
        }
    }

    /// Insert `system` as a waypoint, splitting the segment it lies inside.
    pub fn split_at(&mut self, system: SystemId) -> Result<(), RouteError> {
        let index = match self.locate(system) {
            Location::Interior(i) => i,
            Location::Boundary(_) => return Err(self.reject("split", system, "already a waypoint")),
            Location::Endpoint => {
                return Err(self.reject("split", system, "is the route start or destination"))
            }
            Location::Ambiguous => {
                return Err(self.reject("split", system, "lies inside more than one segment"))
            }
            Location::Absent => return Err(self.reject("split", system, "not on the route")),
        };
        let staged = self.stage_split(index, system)?;
        self.sync(staged)
    }

    /// Drop the waypoint `system`, merging the two segments it joins.
    pub fn remove_waypoint(&mut self, system: SystemId) -> Result<(), RouteError> {
        let Location::Boundary(index) = self.locate(system) else {
            return Err(self.reject("remove", system, "not an intermediate waypoint"));
        };
        let mut staged = self.stage();
        staged.waypoints.remove(index);
        staged.segments.remove(index + 1);
        self.sync(staged)
    }

    /// Move the start, a waypoint or a pass-through system to `new`.
    pub fn move_waypoint(&mut self, old: SystemId, new: SystemId) -> Result<(), RouteError> {
        if old == new {
            return Err(self.reject("move", old, "source and target are the same system"));
        }
        if !self.graph.contains(new) {
            return Err(self.reject("move", new, "unknown system"));
        }
        if self.start == Some(new) || self.waypoints.contains(&new) {
            return Err(self.reject("move", new, "already the start or a waypoint"));
        }

        let mut staged = self.stage();
        if self.start == Some(old) {
            staged.start = Some(new);
        } else if let Some(index) = self.waypoints.iter().position(|w| *w == old) {
            staged.waypoints[index] = new;
        } else if let Location::Interior(index) = self.locate(old) {
            staged = self.stage_split(index, old)?;
            staged.waypoints[index] = new;
        } else {
            return Err(self.reject("move", old, "not on the route"));
        }
        self.sync(staged)
    }

    /// Rebuild every segment and concatenate their paths. Boundary
    /// waypoints appear twice: at the end of one leg and the start of the
    /// next.
    pub fn current_route(&mut self) -> Vec<RouteStep> {
        let mut steps = Vec::new();
        for segment in &mut self.segments {
            segment.rebuild();
            match segment.route() {
                Ok(path) => steps.extend(path),
                Err(e) => warn!(segment = %segment, error = %e, "segment has no path"),
            }
        }
        steps
    }

    /// Position of the first occurrence of `system` in the current route.
    pub fn index_in_current_route(&mut self, system: SystemId) -> Option<usize> {
        self.current_route().iter().position(|s| s.system == system)
    }

    /// Fraction of the way along the current route, from 0.0 at the start
    /// to 1.0 at the destination.
    pub fn alpha_of(&mut self, system: SystemId) -> Option<f64> {
        let route = self.current_route();
        let index = route.iter().position(|s| s.system == system)?;
        if route.len() <= 1 {
            return Some(0.0);
        }
        Some(index as f64 / (route.len() - 1) as f64)
    }

    /// Rebuild every segment, notify the observer for each one whose path
    /// changed and return how many did.
    pub fn rebuild_current_route(&mut self) -> usize {
        let mut changed = 0;
        let mut unreachable = None;
        for segment in &mut self.segments {
            if segment.rebuild() {
                changed += 1;
                if let Some(observer) = self.observer.as_mut() {
                    observer.segment_changed(segment.destination());
                }
            }
            let reachable = segment.route().map(|p| p.len() > 1).unwrap_or(false);
            if !reachable && unreachable.is_none() {
                unreachable = Some((segment.start(), segment.destination()));
            }
        }
        self.last_error = unreachable.map(|(from, to)| self.unreachable(from, to));
        debug!(changed, segments = self.segments.len(), "route rebuilt");
        changed
    }

    pub fn is_set(&mut self) -> bool {
        self.current_route().len() > 1
    }

    /// Sum of the segment weights, if every segment has a path.
    pub fn total_weight(&self) -> Option<f64> {
        if self.segments.is_empty() {
            return None;
        }
        self.segments.iter().map(Segment::total_weight).sum()
    }

    fn stage(&self) -> Staged {
        Staged {
            start: self.start,
            waypoints: self.waypoints.clone(),
            segments: self.segments.clone(),
        }
    }

    fn stage_split(&self, index: usize, system: SystemId) -> Result<Staged, RouteError> {
        let mut staged = self.stage();
        let old_end = staged.waypoints[index];
        let tail = Segment::with_options(Arc::clone(&self.graph), system, old_end, self.options)?;
        staged.segments.insert(index + 1, tail);
        staged.waypoints.insert(index, system);
        Ok(staged)
    }

    fn locate(&self, system: SystemId) -> Location {
        if self.start == Some(system) || self.destination() == Some(system) {
            return Location::Endpoint;
        }
        if let Some(index) = self.waypoints.iter().position(|w| *w == system) {
            return Location::Boundary(index);
        }

        let mut found = self.segments.iter().enumerate().filter(|(_, segment)| {
            match segment.route() {
                Ok(path) if path.len() > 2 => path[1..path.len() - 1]
                    .iter()
                    .any(|step| step.system == system),
                Ok(_) => false,
                Err(e) => {
                    warn!(segment = %segment, error = %e, "skipping segment during lookup");
                    false
                }
            }
        });
        match (found.next(), found.next()) {
            (Some((index, _)), None) => Location::Interior(index),
            (Some(_), Some(_)) => Location::Ambiguous,
            (None, _) => Location::Absent,
        }
    }

    /// Bind and solve every staged segment, then commit all of it or none.
    fn sync(&mut self, staged: Staged) -> Result<(), RouteError> {
        match self.reconcile(staged) {
            Ok(staged) => {
                self.start = staged.start;
                self.waypoints = staged.waypoints;
                self.segments = staged.segments;
                self.last_error = None;
                debug!(route = %self, segments = self.segments.len(), "route committed");
                if let Err(e) = self.store_to_session() {
                    warn!(error = %e, "failed to persist route");
                }
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "route edit not applied");
                self.last_error = Some(e.clone());
                Err(e)
            }
        }
    }

    fn reconcile(&self, staged: Staged) -> Result<Staged, RouteError> {
        let Some(start) = staged.start else {
            return Ok(Staged {
                start: None,
                waypoints: Vec::new(),
                segments: Vec::new(),
            });
        };

        let mut reusable = staged.segments.into_iter();
        let mut segments = Vec::with_capacity(staged.waypoints.len());
        let mut from = start;
        for &to in &staged.waypoints {
            let mut segment = match reusable.next() {
                Some(mut segment) => {
                    segment.set_endpoints(from, to)?;
                    segment.set_options(self.options);
                    segment
                }
                None => Segment::with_options(Arc::clone(&self.graph), from, to, self.options)?,
            };
            segment.rebuild();
            if segment.route()?.len() <= 1 {
                return Err(self.unreachable(from, to));
            }
            segments.push(segment);
            from = to;
        }

        Ok(Staged {
            start: Some(start),
            waypoints: staged.waypoints,
            segments,
        })
    }

    fn reject(&self, operation: &'static str, system: SystemId, reason: &str) -> RouteError {
        warn!(operation, system = %self.name(system), reason, "route edit rejected");
        RouteError::EditRejected {
            operation,
            system,
            reason: reason.to_string(),
        }
    }

    fn unreachable(&self, from: SystemId, to: SystemId) -> RouteError {
        RouteError::SegmentUnreachable {
            from,
            to,
            from_name: self.name(from),
            to_name: self.name(to),
        }
    }

    fn name(&self, id: SystemId) -> String {
        self.graph
            .system(id)
            .map(|s| s.name.clone())
            .unwrap_or_else(|| id.to_string())
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self
            .start
            .iter()
            .chain(self.waypoints.iter())
            .map(|id| self.name(*id))
            .collect();
        f.write_str(&names.join(" > "))
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("options", &self.options)
            .field("start", &self.start)
            .field("waypoints", &self.waypoints)
            .field("segments", &self.segments.len())
            .field("last_error", &self.last_error)
            .field("observed", &self.observer.is_some())
            .field("session", &self.session.as_ref().map(|s| s.key.as_str()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MemorySessionStore;
    use pretty_assertions::assert_eq;
    use starroute_graph::{JumpKind, Metric, System};
    use std::cell::RefCell;
    use std::rc::Rc;

    // 1 - 2 - 3 - 4 - 5 - 6 in a line, unit lengths, plus an island 9.
    fn line() -> Arc<StarGraph> {
        let mut builder = StarGraph::builder();
        for id in 1..=6 {
            builder
                .add_system(System::new(id, format!("S{id}"), [id as f64, 0.0, 0.0]))
                .unwrap();
        }
        builder.add_system(System::new(9, "Island", [0.0, 50.0, 0.0])).unwrap();
        for id in 1..6 {
            builder
                .connect_both(SystemId(id), SystemId(id + 1), JumpKind::Normal)
                .unwrap();
        }
        Arc::new(builder.build())
    }

    fn ids(values: &[u32]) -> Vec<SystemId> {
        values.iter().copied().map(SystemId).collect()
    }

    fn route(start: u32, waypoints: &[u32]) -> Route {
        Route::with_waypoints(
            line(),
            SearchOptions::unrestricted(Metric::Distance),
            SystemId(start),
            ids(waypoints),
        )
    }

    fn path(route: &mut Route) -> Vec<u32> {
        route.current_route().iter().map(|s| s.system.0).collect()
    }

    fn assert_consistent(route: &Route) {
        assert_eq!(route.segments().len(), route.waypoints().len());
        let mut from = route.start();
        for (segment, waypoint) in route.segments().iter().zip(route.waypoints()) {
            assert_eq!(Some(segment.start()), from);
            assert_eq!(segment.destination(), *waypoint);
            from = Some(*waypoint);
        }
    }

    #[test]
    fn boundary_waypoints_repeat_in_current_route() {
        let mut route = route(1, &[4, 6]);
        assert!(route.last_error().is_none());
        assert_eq!(path(&mut route), vec![1, 2, 3, 4, 4, 5, 6]);
        assert!(route.is_set());
        assert_eq!(route.total_weight(), Some(5.0));
        assert_eq!(route.to_string(), "S1 > S4 > S6");
    }

    #[test]
    fn split_inserts_waypoint_and_segment() {
        let mut route = route(1, &[4, 6]);
        route.split_at(SystemId(5)).unwrap();
        assert_eq!(route.waypoints(), ids(&[4, 5, 6]).as_slice());
        assert_consistent(&route);
        assert_eq!(path(&mut route), vec![1, 2, 3, 4, 4, 5, 5, 6]);
    }

    #[test]
    fn split_rejections_leave_route_untouched() {
        let mut route = route(1, &[4, 6]);
        for system in [1, 4, 6, 9] {
            let err = route.split_at(SystemId(system)).unwrap_err();
            assert!(matches!(err, RouteError::EditRejected { operation: "split", .. }));
        }
        assert_eq!(route.waypoints(), ids(&[4, 6]).as_slice());
        assert!(route.last_error().is_none());
    }

    #[test]
    fn remove_merges_neighbouring_segments() {
        let mut route = route(1, &[3, 6]);
        route.remove_waypoint(SystemId(3)).unwrap();
        assert_eq!(route.waypoints(), ids(&[6]).as_slice());
        assert_consistent(&route);
        assert_eq!(path(&mut route), vec![1, 2, 3, 4, 5, 6]);

        assert!(route.remove_waypoint(SystemId(1)).is_err());
        assert!(route.remove_waypoint(SystemId(6)).is_err());
        assert!(route.remove_waypoint(SystemId(4)).is_err());
    }

    #[test]
    fn split_then_remove_restores_waypoints() {
        let mut route = route(1, &[6]);
        let before = path(&mut route);
        route.split_at(SystemId(3)).unwrap();
        route.remove_waypoint(SystemId(3)).unwrap();
        assert_eq!(route.waypoints(), ids(&[6]).as_slice());
        assert_eq!(path(&mut route), before);
    }

    #[test]
    fn move_start_waypoint_and_interior() {
        let mut route = route(1, &[4, 6]);

        route.move_waypoint(SystemId(1), SystemId(2)).unwrap();
        assert_eq!(route.start(), Some(SystemId(2)));

        route.move_waypoint(SystemId(4), SystemId(3)).unwrap();
        assert_eq!(route.waypoints(), ids(&[3, 6]).as_slice());

        // 5 lies inside 3 -> 6; moving it splits there first.
        route.move_waypoint(SystemId(5), SystemId(1)).unwrap();
        assert_eq!(route.waypoints(), ids(&[3, 1, 6]).as_slice());
        assert_consistent(&route);
    }

    #[test]
    fn move_rejections() {
        let mut route = route(1, &[4, 6]);
        let cases = [(4, 4), (4, 42), (4, 6), (2, 1), (9, 3)];
        for (old, new) in cases {
            let err = route.move_waypoint(SystemId(old), SystemId(new)).unwrap_err();
            assert!(
                matches!(err, RouteError::EditRejected { operation: "move", .. }),
                "{old} -> {new}: {err}"
            );
        }
        assert_eq!(route.start(), Some(SystemId(1)));
        assert_eq!(route.waypoints(), ids(&[4, 6]).as_slice());
    }

    #[test]
    fn unreachable_edit_keeps_previous_state() {
        let mut route = route(1, &[4]);
        let err = route.move_waypoint(SystemId(4), SystemId(9)).unwrap_err();
        assert!(err.is_unreachable());
        assert_eq!(err.to_string(), "No route from S1 to Island available");
        assert_eq!(route.last_error(), Some(&err));
        assert_eq!(route.waypoints(), ids(&[4]).as_slice());
        assert_consistent(&route);

        route.move_waypoint(SystemId(4), SystemId(5)).unwrap();
        assert!(route.last_error().is_none());
    }

    #[test]
    fn set_route_drops_unknown_ids() {
        let mut route = Route::new(line(), SearchOptions::default());
        route.set_route(Some(SystemId(1)), ids(&[3, 77, 5])).unwrap();
        assert_eq!(route.waypoints(), ids(&[3, 5]).as_slice());

        route.set_route(Some(SystemId(77)), ids(&[3])).unwrap();
        assert_eq!(route.start(), None);
        assert!(route.waypoints().is_empty());
        assert!(!route.is_set());
    }

    #[test]
    fn set_route_rejects_repeated_systems() {
        let mut route = route(1, &[4, 6]);
        for (start, waypoints) in [(1, vec![3, 5, 3]), (2, vec![4, 2])] {
            let err = route
                .set_route(Some(SystemId(start)), ids(&waypoints))
                .unwrap_err();
            assert!(matches!(err, RouteError::EditRejected { operation: "set route", .. }));
        }
        assert_eq!(route.start(), Some(SystemId(1)));
        assert_eq!(route.waypoints(), ids(&[4, 6]).as_slice());
        assert!(route.last_error().is_none());
    }

    #[test]
    fn position_queries_distinguish_first_from_absent() {
        let mut route = route(1, &[3]);
        assert_eq!(route.index_in_current_route(SystemId(1)), Some(0));
        assert_eq!(route.index_in_current_route(SystemId(9)), None);
        assert_eq!(route.alpha_of(SystemId(1)), Some(0.0));
        assert_eq!(route.alpha_of(SystemId(2)), Some(0.5));
        assert_eq!(route.alpha_of(SystemId(3)), Some(1.0));
        assert_eq!(route.alpha_of(SystemId(9)), None);
    }

    #[test]
    fn lookup_skips_segments_without_a_path() {
        let mut route = route(1, &[3, 6]);
        let graph = Arc::clone(route.graph());
        route.segments[1] = Segment::new(graph, SystemId(3), SystemId(6)).unwrap();

        assert_eq!(route.locate(SystemId(2)), Location::Interior(0));
        assert_eq!(route.locate(SystemId(5)), Location::Absent);
        assert_eq!(route.locate(SystemId(3)), Location::Boundary(0));
        assert_eq!(route.locate(SystemId(6)), Location::Endpoint);
    }

    #[test]
    fn observer_hears_about_changed_segments() {
        let mut route = route(1, &[3, 6]);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        route.set_observer(Box::new(move |id: SystemId| sink.borrow_mut().push(id)));

        assert_eq!(route.rebuild_current_route(), 0);
        route.set_search_options(SearchOptions::unrestricted(Metric::Time));
        assert_eq!(route.rebuild_current_route(), 2);
        assert_eq!(*seen.borrow(), ids(&[3, 6]));
    }

    #[test]
    fn committed_edits_reach_the_attached_store() {
        let mut route = route(1, &[6]);
        route.attach_session(Box::new(MemorySessionStore::new()), "currentRoute");
        route.split_at(SystemId(4)).unwrap();

        let mut restored = Route::new(line(), SearchOptions::default());
        let store = route.session.take().unwrap().store;
        restored.attach_session(store, "currentRoute");
        assert!(restored.restore_from_session().unwrap());
        assert_eq!(restored.start(), Some(SystemId(1)));
        assert_eq!(restored.waypoints(), ids(&[4, 6]).as_slice());

        restored.clear();
        assert!(!restored.restore_from_session().unwrap());
    }
}
