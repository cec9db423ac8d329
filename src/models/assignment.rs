//! Assignment state: who drives, who rides, who is still waiting.

use std::collections::BTreeMap;

use crate::distance::Distance;
use crate::error::RouteError;
use crate::evaluation::InsertionEngine;
use crate::local_search::{AbsorbDriver, AddPassenger, Move, Plan, SwapPassengers, SwapSide};

use super::{Problem, Route, User, UserId};

/// The global partition of users and the routes of the driver pool.
///
/// Each driver in the pool owns a route; drivers with an empty route are
/// *idle*, the others *active*. Demands are either `unserved` or carried by
/// exactly one route. An idle driver absorbed into another route leaves
/// the pool and rides as a passenger.
///
/// The objective is the total distance driven by the pool (idle drivers
/// count their direct trip) plus `max_drive_distance` per unserved demand.
///
/// State changes only through [`AssignmentState::commit`], which applies
/// a [`Plan`] produced by one of the operators.
///
/// # Examples
///
/// ```
/// use u_rideshare::distance::Point;
/// use u_rideshare::evaluation::InsertionEngine;
/// use u_rideshare::models::{AssignmentState, User};
///
/// let driver = User::new(0, Point::new(0, 0), Point::new(10, 10));
/// let demand = User::new(1, Point::new(1, 1), Point::new(2, 2));
/// let state = AssignmentState::from_parts(vec![driver], vec![demand], InsertionEngine::new(300));
///
/// assert_eq!(state.unserved(), &[1]);
/// assert_eq!(state.idle_drivers(), vec![0]);
/// assert_eq!(state.objective(), 20 + 300);
/// ```
#[derive(Debug, Clone)]
pub struct AssignmentState {
    users: BTreeMap<UserId, User>,
    routes: BTreeMap<UserId, Route>,
    unserved: Vec<UserId>,
    absorbed: Vec<UserId>,
    engine: InsertionEngine,
}

impl AssignmentState {
    /// Creates the initial state of a problem: every demand unserved,
    /// every driver idle.
    pub fn new(problem: &Problem) -> Self {
        // Problem guarantees every id indexes a user.
        let pick = |ids: &[UserId]| -> Vec<User> {
            ids.iter().map(|&id| problem.users()[id]).collect()
        };
        Self::from_parts(
            pick(problem.drivers()),
            pick(problem.demands()),
            InsertionEngine::new(problem.max_drive_distance()),
        )
    }

    /// Creates an initial state from explicit drivers and demands.
    pub fn from_parts(drivers: Vec<User>, demands: Vec<User>, engine: InsertionEngine) -> Self {
        let unserved = demands.iter().map(User::id).collect();
        let routes = drivers.iter().map(|d| (d.id(), Route::new(*d))).collect();
        let users = drivers
            .into_iter()
            .chain(demands)
            .map(|u| (u.id(), u))
            .collect();
        Self {
            users,
            routes,
            unserved,
            absorbed: Vec::new(),
            engine,
        }
    }

    /// The insertion engine shared by all operators.
    pub fn engine(&self) -> &InsertionEngine {
        &self.engine
    }

    /// Looks up any user (driver or demand) by ID.
    pub fn user(&self, id: UserId) -> Option<&User> {
        self.users.get(&id)
    }

    /// Route of a driver still in the pool.
    pub fn route(&self, driver: UserId) -> Option<&Route> {
        self.routes.get(&driver)
    }

    /// Routes of the driver pool in driver ID order.
    pub fn routes(&self) -> impl Iterator<Item = &Route> {
        self.routes.values()
    }

    /// IDs of the driver pool.
    pub fn drivers(&self) -> Vec<UserId> {
        self.routes.keys().copied().collect()
    }

    /// Drivers with nobody on board.
    pub fn idle_drivers(&self) -> Vec<UserId> {
        self.routes
            .iter()
            .filter(|(_, r)| r.is_empty())
            .map(|(&id, _)| id)
            .collect()
    }

    /// Drivers carrying at least one passenger.
    pub fn active_drivers(&self) -> Vec<UserId> {
        self.routes
            .iter()
            .filter(|(_, r)| !r.is_empty())
            .map(|(&id, _)| id)
            .collect()
    }

    /// Demands not assigned to any route.
    pub fn unserved(&self) -> &[UserId] {
        &self.unserved
    }

    /// Former drivers now riding in another route.
    pub fn absorbed(&self) -> &[UserId] {
        &self.absorbed
    }

    /// Returns `true` once every demand is served.
    pub fn is_final(&self) -> bool {
        self.unserved.is_empty()
    }

    /// Total distance driven by the pool.
    pub fn total_distance(&self) -> Distance {
        self.routes.values().map(Route::distance).sum()
    }

    /// Penalty charged for unserved demands.
    pub fn penalty(&self) -> Distance {
        self.engine.max_drive_distance() * self.unserved.len() as Distance
    }

    /// Value minimized by the search.
    pub fn objective(&self) -> Distance {
        self.total_distance() + self.penalty()
    }

    /// One AddPassenger per (pool driver, unserved demand), drivers outermost.
    pub fn add_passenger_moves(&self) -> Vec<Move> {
        self.routes
            .keys()
            .flat_map(|&driver| {
                self.unserved
                    .iter()
                    .map(move |&passenger| Move::AddPassenger(AddPassenger { driver, passenger }))
            })
            .collect()
    }

    /// One SwapPassengers per unordered pair of active drivers.
    pub fn swap_moves(&self) -> Vec<Move> {
        let active = self.active_drivers();
        let mut moves = Vec::new();
        for (i, &first) in active.iter().enumerate() {
            for &second in &active[i + 1..] {
                moves.push(Move::SwapPassengers(SwapPassengers { first, second }));
            }
        }
        moves
    }

    /// One AbsorbDriver per (host, idle driver) pair, hosts drawn from the
    /// whole pool. Empty until every demand is served.
    pub fn absorb_moves(&self) -> Vec<Move> {
        if !self.is_final() {
            return Vec::new();
        }
        let idle = self.idle_drivers();
        let mut moves = Vec::new();
        for &host in self.routes.keys() {
            for &driver in &idle {
                if host != driver {
                    moves.push(Move::AbsorbDriver(AbsorbDriver { host, driver }));
                }
            }
        }
        moves
    }

    /// Every move of the neighborhood, in enumeration order: additions,
    /// swaps (when more than one driver is left), absorptions.
    pub fn all_moves(&self) -> Vec<Move> {
        let mut moves = self.add_passenger_moves();
        if self.routes.len() > 1 {
            moves.extend(self.swap_moves());
        }
        moves.extend(self.absorb_moves());
        moves
    }

    /// Applies an evaluated plan.
    ///
    /// Plans must come from evaluating an operator against the current
    /// state; an error means the plan was stale and leaves the state
    /// unchanged.
    pub fn commit(&mut self, plan: &Plan) -> Result<(), RouteError> {
        match *plan {
            Plan::AddPassenger {
                driver,
                passenger,
                insertion,
                ..
            } => {
                if !self.unserved.contains(&passenger) {
                    return Err(RouteError::NotUnserved(passenger));
                }
                let user = self.known_user(passenger)?;
                let route = self.route_mut(driver)?;
                route.insert_at(user, insertion.take, insertion.drop)?;
                self.unserved.retain(|&id| id != passenger);
                self.check_route(driver);
            }
            Plan::SwapPassengers { first, second, .. } => {
                if first.driver == second.driver {
                    return Err(RouteError::UnknownDriver(second.driver));
                }
                let outgoing_first = self.known_user(first.outgoing)?;
                let outgoing_second = self.known_user(second.outgoing)?;
                let into_first = self.swapped_route(&first, outgoing_second)?;
                let into_second = self.swapped_route(&second, outgoing_first)?;

                self.routes.insert(first.driver, into_first);
                self.routes.insert(second.driver, into_second);
                self.check_route(first.driver);
                self.check_route(second.driver);
            }
            Plan::AbsorbDriver {
                host,
                driver,
                insertion,
                ..
            } => {
                let user = self.known_user(driver)?;
                if host == driver {
                    return Err(RouteError::UnknownDriver(driver));
                }
                match self.routes.get(&driver) {
                    None => return Err(RouteError::UnknownDriver(driver)),
                    Some(route) if !route.is_empty() => {
                        return Err(RouteError::DriverNotIdle(driver))
                    }
                    Some(_) => {}
                }
                self.route_mut(host)?
                    .insert_at(user, insertion.take, insertion.drop)?;
                self.routes.remove(&driver);
                self.absorbed.push(driver);
                self.check_route(host);
            }
        }
        Ok(())
    }

    /// Builds one side of a swap on a copy of the driver's route.
    fn swapped_route(&self, side: &SwapSide, incoming: User) -> Result<Route, RouteError> {
        let route = self
            .routes
            .get(&side.driver)
            .ok_or(RouteError::UnknownDriver(side.driver))?;
        let mut route = route
            .without_passenger(side.outgoing)
            .ok_or(RouteError::NotOnBoard {
                driver: side.driver,
                passenger: side.outgoing,
            })?;
        route.insert_at(incoming, side.insertion.take, side.insertion.drop)?;
        Ok(route)
    }

    fn known_user(&self, id: UserId) -> Result<User, RouteError> {
        self.users
            .get(&id)
            .copied()
            .ok_or(RouteError::UnknownDriver(id))
    }

    fn route_mut(&mut self, driver: UserId) -> Result<&mut Route, RouteError> {
        self.routes
            .get_mut(&driver)
            .ok_or(RouteError::UnknownDriver(driver))
    }

    fn check_route(&self, driver: UserId) {
        debug_assert!(
            self.routes
                .get(&driver)
                .is_none_or(|r| !r.is_over_occupied()),
            "driver {driver} over capacity after commit"
        );
    }
}

impl std::fmt::Display for AssignmentState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "objective {} (distance {}, {} unserved, {} absorbed)",
            self.objective(),
            self.total_distance(),
            self.unserved.len(),
            self.absorbed.len()
        )?;
        for route in self.routes.values() {
            writeln!(f, "  {route}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::Point;
    use crate::evaluation::InsertionCandidate;

    fn user(id: UserId, from: (i64, i64), to: (i64, i64)) -> User {
        User::new(id, Point::new(from.0, from.1), Point::new(to.0, to.1))
    }

    fn small_state() -> AssignmentState {
        AssignmentState::from_parts(
            vec![user(0, (0, 0), (10, 10)), user(1, (0, 10), (10, 0))],
            vec![user(2, (1, 1), (2, 2)), user(3, (1, 9), (9, 1))],
            InsertionEngine::new(300),
        )
    }

    #[test]
    fn test_initial_partition() {
        let state = small_state();
        assert_eq!(state.drivers(), vec![0, 1]);
        assert_eq!(state.idle_drivers(), vec![0, 1]);
        assert!(state.active_drivers().is_empty());
        assert_eq!(state.unserved(), &[2, 3]);
        assert!(!state.is_final());
        assert_eq!(state.total_distance(), 40);
        assert_eq!(state.penalty(), 600);
        assert_eq!(state.objective(), 640);
    }

    #[test]
    fn test_from_problem() {
        let users = vec![
            user(0, (1, 1), (2, 2)),
            user(1, (0, 0), (10, 10)),
            user(2, (5, 5), (6, 6)),
        ];
        let problem = Problem::new(users, vec![0, 2], 250);
        let state = AssignmentState::new(&problem);
        assert_eq!(state.drivers(), vec![1]);
        assert_eq!(state.unserved(), &[0, 2]);
        assert_eq!(state.engine().max_drive_distance(), 250);
        assert_eq!(state.user(2).map(User::id), Some(2));
    }

    #[test]
    fn test_move_enumeration() {
        let state = small_state();
        assert_eq!(state.add_passenger_moves().len(), 4);
        assert!(state.swap_moves().is_empty());
        assert!(state.absorb_moves().is_empty());
        assert_eq!(state.all_moves().len(), 4);
        assert_eq!(
            state.add_passenger_moves()[1],
            Move::AddPassenger(AddPassenger {
                driver: 0,
                passenger: 3
            })
        );
    }

    #[test]
    fn test_absorb_moves_once_final() {
        let mut state = AssignmentState::from_parts(
            vec![
                user(0, (0, 0), (10, 10)),
                user(1, (1, 1), (9, 9)),
                user(2, (0, 1), (9, 8)),
            ],
            vec![user(3, (2, 2), (3, 3))],
            InsertionEngine::new(300),
        );
        assert!(state.absorb_moves().is_empty());
        AddPassenger {
            driver: 0,
            passenger: 3,
        }
        .apply(&mut state)
        .expect("valid");
        assert!(state.is_final());
        // hosts {0, 1, 2} x idle {1, 2}, minus self pairs
        assert_eq!(state.absorb_moves().len(), 4);
    }

    #[test]
    fn test_commit_rejects_stale_plan() {
        let mut state = small_state();
        let mv = AddPassenger {
            driver: 0,
            passenger: 2,
        };
        let plan = mv.evaluate(&state).expect("feasible");
        state.commit(&plan).expect("fresh plan");
        assert_eq!(state.commit(&plan), Err(RouteError::NotUnserved(2)));
    }

    #[test]
    fn test_commit_rejects_demand_served_elsewhere() {
        let mut state = small_state();
        let to_first = AddPassenger {
            driver: 0,
            passenger: 2,
        }
        .evaluate(&state)
        .expect("feasible");
        let to_second = AddPassenger {
            driver: 1,
            passenger: 2,
        }
        .evaluate(&state)
        .expect("feasible");

        state.commit(&to_first).expect("fresh plan");
        assert_eq!(state.commit(&to_second), Err(RouteError::NotUnserved(2)));

        let carriers = state.routes().filter(|r| r.has_passenger(2)).count();
        assert_eq!(carriers, 1);
        assert_eq!(state.unserved(), &[3]);
    }

    #[test]
    fn test_failed_swap_leaves_state_unchanged() {
        let mut state = small_state();
        for (driver, passenger) in [(0, 2), (1, 3)] {
            AddPassenger { driver, passenger }
                .apply(&mut state)
                .expect("valid");
        }
        let before = state.clone();
        let at = |take, drop| InsertionCandidate {
            take,
            drop,
            distance: 0,
        };
        let plan = Plan::SwapPassengers {
            first: SwapSide {
                driver: 0,
                outgoing: 2,
                insertion: at(0, 0),
            },
            second: SwapSide {
                driver: 1,
                outgoing: 3,
                insertion: at(5, 5),
            },
            delta: -1,
        };

        assert_eq!(
            state.commit(&plan),
            Err(RouteError::InvalidPosition {
                take: 5,
                drop: 5,
                len: 0
            })
        );
        assert_eq!(state.route(0), before.route(0));
        assert_eq!(state.route(1), before.route(1));
        assert!(state.route(0).is_some_and(|r| r.has_passenger(2)));
        assert!(state.route(1).is_some_and(|r| r.has_passenger(3)));
        assert!(state.unserved().is_empty());
    }

    #[test]
    fn test_commit_rejects_absorbing_active_driver() {
        let mut state = small_state();
        AddPassenger {
            driver: 1,
            passenger: 3,
        }
        .apply(&mut state)
        .expect("valid");
        let plan = Plan::AbsorbDriver {
            host: 0,
            driver: 1,
            insertion: InsertionCandidate {
                take: 0,
                drop: 0,
                distance: 0,
            },
            delta: -1,
        };

        assert_eq!(state.commit(&plan), Err(RouteError::DriverNotIdle(1)));
        assert!(state.route(1).is_some_and(|r| r.has_passenger(3)));
        assert!(state.route(0).is_some_and(Route::is_empty));
        assert!(state.absorbed().is_empty());
    }

    #[test]
    fn test_display_dump() {
        let state = small_state();
        let dump = state.to_string();
        assert!(dump.starts_with("objective 640 (distance 40, 2 unserved, 0 absorbed)"));
        assert!(dump.contains("driver 0: alone (dist 20)"));
        assert!(dump.contains("driver 1: alone (dist 20)"));
    }
}
