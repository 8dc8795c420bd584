use mapd_app::adapters::outbound::init_noop_logger;
use mapd_app::domains::path_planning::*;
use mapd_app::domains::task_assignment::*;
use std::cell::RefCell;
use std::collections::HashSet;

fn c(x: i32, y: i32) -> Cell {
    Cell::new(x, y)
}

fn scheduler() -> TaskScheduler {
    TaskScheduler::new(MlaStarPlanner::default(), SchedulerSettings::default(), init_noop_logger())
}

/// Planner stub that records every call and walks straight to the last goal.
#[derive(Default)]
struct RecordingPlanner {
    calls: RefCell<Vec<(Cell, Vec<Cell>)>>,
}

impl RoutePlanner for RecordingPlanner {
    fn plan(&self, start: Cell, goals: &GoalSequence, _environment: &Environment) -> Option<Path> {
        self.calls.borrow_mut().push((start, goals.goals().to_vec()));
        let mut cells = vec![start];
        cells.extend_from_slice(goals.goals());
        Some(Path::new(cells))
    }
}

struct RejectingPlanner;

impl RoutePlanner for RejectingPlanner {
    fn plan(&self, _start: Cell, _goals: &GoalSequence, _environment: &Environment) -> Option<Path> {
        None
    }
}

#[cfg(test)]
mod agent_tests {
    use super::*;

    #[test]
    fn test_assign_moves_agent_to_path_end() {
        let mut agent = Agent::new(1, c(0, 0));
        assert_eq!(agent.status(), AgentStatus::Available);

        agent.assign(7, Path::new(vec![c(0, 0), c(1, 0), c(1, 1)])).unwrap();

        assert_eq!(agent.status(), AgentStatus::Busy);
        assert_eq!(agent.location(), c(1, 1));
        assert_eq!(agent.active_task(), Some(7));
        assert_eq!(agent.path().map(|p| p.steps()), Some(2));
    }

    #[test]
    fn test_second_assign_is_rejected() {
        let mut agent = Agent::new(1, c(0, 0));
        agent.assign(1, Path::new(vec![c(0, 0), c(0, 1)])).unwrap();

        let result = agent.assign(2, Path::new(vec![c(0, 1), c(0, 2)]));

        assert!(result.is_err());
        assert_eq!(agent.active_task(), Some(1));
        assert_eq!(agent.location(), c(0, 1));
    }

    #[test]
    fn test_release_path_frees_agent() {
        let mut agent = Agent::new(3, c(2, 2));
        agent.assign(4, Path::new(vec![c(2, 2), c(2, 3)])).unwrap();

        let released = agent.release_path().expect("active path");

        assert_eq!(released.end(), Some(c(2, 3)));
        assert!(agent.is_available());
        assert_eq!(agent.active_task(), None);
        assert_eq!(agent.location(), c(2, 3));
        assert!(agent.release_path().is_none());
    }
}

#[cfg(test)]
mod scheduler_tests {
    use super::*;

    #[test]
    fn test_each_task_goes_to_the_nearer_agent() {
        let env = Environment::open(10, 10).unwrap();
        let mut agents = vec![Agent::new(1, c(0, 0)), Agent::new(2, c(9, 9))];
        let tasks = vec![
            Task::new(1, c(1, 1), c(3, 3)),
            Task::new(2, c(8, 8), c(6, 6)),
        ];

        let outcome = scheduler().assign(&mut agents, tasks, &env);

        assert!(outcome.is_fully_assigned());
        assert_eq!(outcome.assignments.len(), 2);
        assert_eq!(outcome.get(1).unwrap().agent_id, 1);
        assert_eq!(outcome.get(2).unwrap().agent_id, 2);
        assert_eq!(outcome.get(1).unwrap().path.steps(), 6);
        assert_eq!(outcome.get(2).unwrap().path.steps(), 6);

        assert_eq!(agents[0].location(), c(3, 3));
        assert_eq!(agents[1].location(), c(6, 6));
        assert_eq!(agents[0].active_task(), Some(1));
        assert_eq!(agents[1].active_task(), Some(2));
    }

    #[test]
    fn test_committed_task_is_not_offered_to_a_second_agent() {
        let env = Environment::open(5, 5).unwrap();
        let mut agents = vec![Agent::new(1, c(0, 0)), Agent::new(2, c(0, 1))];
        let tasks = vec![
            Task::new(1, c(0, 2), c(0, 4)),
            Task::new(2, c(4, 4), c(4, 0)),
        ];

        let outcome = scheduler().assign(&mut agents, tasks, &env);

        assert_eq!(outcome.get(1).unwrap().agent_id, 2);
        assert_eq!(outcome.get(2).unwrap().agent_id, 1);
        assert_eq!(outcome.commit_order, vec![1, 2]);
        assert_eq!(outcome.rounds, 1);
    }

    #[test]
    fn test_planner_is_consulted_once_per_committed_task() {
        let env = Environment::open(6, 6).unwrap();
        let scheduler = TaskScheduler::new(
            RecordingPlanner::default(),
            SchedulerSettings::default(),
            init_noop_logger(),
        );
        let mut agents = vec![Agent::new(1, c(0, 0)), Agent::new(2, c(1, 0)), Agent::new(3, c(5, 5))];
        let tasks = vec![Task::new(10, c(2, 0), c(2, 5))];

        let outcome = scheduler.assign(&mut agents, tasks, &env);

        assert_eq!(outcome.get(10).unwrap().agent_id, 2);
        let calls = scheduler.planner().calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0], (c(1, 0), vec![c(2, 0), c(2, 5)]));
        assert!(agents[0].is_available());
        assert!(agents[2].is_available());
    }

    #[test]
    fn test_equal_distances_break_ties_by_agent_id() {
        let env = Environment::open(5, 5).unwrap();
        let mut agents = vec![Agent::new(2, c(0, 0)), Agent::new(1, c(2, 0))];
        let tasks = vec![Task::new(1, c(1, 0), c(1, 3))];

        let outcome = scheduler().assign(&mut agents, tasks, &env);

        assert_eq!(outcome.get(1).unwrap().agent_id, 1);
        assert!(agents[0].is_available());
    }

    #[test]
    fn test_equal_distances_break_ties_by_task_id() {
        let env = Environment::open(5, 5).unwrap();
        let mut agents = vec![Agent::new(1, c(2, 2))];
        let tasks = vec![Task::new(9, c(2, 3), c(4, 3)), Task::new(3, c(2, 1), c(0, 1))];

        let outcome = scheduler().assign(&mut agents, tasks, &env);

        assert_eq!(outcome.commit_order, vec![3]);
        assert_eq!(outcome.get(3).unwrap().agent_id, 1);
        assert_eq!(outcome.unassigned.iter().map(|t| t.id()).collect::<Vec<_>>(), vec![9]);
        assert_eq!(agents[0].location(), c(0, 1));
    }

    #[test]
    fn test_expansion_ceiling_leaves_task_pending() {
        let env = Environment::open(6, 6).unwrap();
        let planner = MlaStarPlanner::new(PlannerSettings {
            max_expansions: Some(1),
            ..PlannerSettings::default()
        });
        let scheduler = TaskScheduler::new(planner, SchedulerSettings::default(), init_noop_logger());
        let mut agents = vec![Agent::new(1, c(0, 0))];
        let tasks = vec![Task::new(1, c(3, 0), c(3, 3))];

        let outcome = scheduler.assign(&mut agents, tasks, &env);

        assert!(outcome.assignments.is_empty());
        assert_eq!(outcome.unassigned, vec![Task::new(1, c(3, 0), c(3, 3))]);
        assert_eq!(outcome.rounds, 1);
        assert!(agents[0].is_available());
        assert_eq!(agents[0].location(), c(0, 0));
    }

    #[test]
    fn test_more_tasks_than_agents_leaves_residual() {
        let env = Environment::open(8, 8).unwrap();
        let mut agents = vec![Agent::new(1, c(0, 0))];
        let tasks = vec![
            Task::new(1, c(5, 5), c(6, 6)),
            Task::new(2, c(1, 0), c(1, 1)),
            Task::new(3, c(7, 7), c(0, 7)),
        ];

        let outcome = scheduler().assign(&mut agents, tasks, &env);

        assert_eq!(outcome.assignments.len(), 1);
        assert_eq!(outcome.get(2).unwrap().agent_id, 1);
        let pending: Vec<TaskId> = outcome.unassigned.iter().map(|t| t.id()).collect();
        assert_eq!(pending, vec![1, 3]);
        assert_eq!(agents[0].active_task(), Some(2));
    }

    #[test]
    fn test_infeasible_task_stays_pending() {
        let env = Environment::new(6, 6, vec![c(5, 5)], vec![]).unwrap();
        let mut agents = vec![Agent::new(1, c(0, 0)), Agent::new(2, c(5, 0))];
        let tasks = vec![
            Task::new(1, c(1, 1), c(5, 5)), // delivery on an obstacle
            Task::new(2, c(4, 0), c(4, 3)),
        ];

        let outcome = scheduler().assign(&mut agents, tasks, &env);

        assert_eq!(outcome.get(2).unwrap().agent_id, 2);
        assert!(outcome.get(1).is_none());
        assert_eq!(outcome.unassigned, vec![Task::new(1, c(1, 1), c(5, 5))]);
        assert_eq!(outcome.rounds, 2);
        assert!(agents[0].is_available());
        assert_eq!(agents[0].location(), c(0, 0));
    }

    #[test]
    fn test_rejecting_planner_assigns_nothing() {
        let env = Environment::open(4, 4).unwrap();
        let scheduler = TaskScheduler::new(RejectingPlanner, SchedulerSettings::default(), init_noop_logger());
        let mut agents = vec![Agent::new(1, c(0, 0)), Agent::new(2, c(3, 3))];
        let tasks = vec![Task::new(1, c(1, 1), c(2, 2)), Task::new(2, c(0, 3), c(3, 0))];

        let outcome = scheduler.assign(&mut agents, tasks, &env);

        assert!(outcome.assignments.is_empty());
        assert_eq!(outcome.unassigned.len(), 2);
        assert_eq!(outcome.rounds, 1);
        assert!(agents.iter().all(|a| a.is_available()));
    }

    #[test]
    fn test_busy_agents_are_not_available() {
        let env = Environment::open(4, 4).unwrap();
        let mut busy = Agent::new(1, c(0, 0));
        busy.assign(99, Path::new(vec![c(0, 0), c(0, 1)])).unwrap();
        let mut agents = vec![busy];

        let outcome = scheduler().assign(&mut agents, vec![Task::new(1, c(1, 1), c(2, 2))], &env);

        assert_eq!(outcome.rounds, 0);
        assert_eq!(outcome.unassigned.len(), 1);
        assert_eq!(agents[0].active_task(), Some(99));
    }

    #[test]
    fn test_round_limit_stops_assignment() {
        let env = Environment::open(4, 4).unwrap();
        let scheduler = TaskScheduler::new(
            MlaStarPlanner::default(),
            SchedulerSettings { max_rounds: Some(0) },
            init_noop_logger(),
        );
        let mut agents = vec![Agent::new(1, c(0, 0))];

        let outcome = scheduler.assign(&mut agents, vec![Task::new(1, c(1, 1), c(2, 2))], &env);

        assert_eq!(outcome.rounds, 0);
        assert!(outcome.assignments.is_empty());
        assert_eq!(outcome.unassigned.len(), 1);
    }

    #[test]
    fn test_duplicate_task_ids_are_assigned_once() {
        let env = Environment::open(5, 5).unwrap();
        let mut agents = vec![Agent::new(1, c(0, 0)), Agent::new(2, c(4, 4))];
        let tasks = vec![Task::new(1, c(1, 0), c(2, 0)), Task::new(1, c(4, 3), c(3, 3))];

        let outcome = scheduler().assign(&mut agents, tasks, &env);

        assert_eq!(outcome.assignments.len(), 1);
        assert!(outcome.unassigned.is_empty());
        assert_eq!(outcome.get(1).unwrap().agent_id, 1);
    }

    #[test]
    fn test_no_task_or_agent_appears_twice() {
        let env = Environment::new(12, 12, vec![c(5, 5), c(5, 6), c(6, 5)], vec![]).unwrap();
        let mut agents: Vec<Agent> = (0..4).map(|i| Agent::new(i, c(i as i32 * 3, 0))).collect();
        let mut generator = TaskGenerator::seeded(7, 1);
        let tasks = generator.generate(9, &env, &agents);
        assert_eq!(tasks.len(), 9);

        let outcome = scheduler().assign(&mut agents, tasks, &env);

        let agent_ids: HashSet<AgentId> = outcome.assignments.values().map(|a| a.agent_id).collect();
        assert_eq!(agent_ids.len(), outcome.assignments.len());
        assert_eq!(outcome.assignments.len(), 4);
        assert_eq!(outcome.assignments.len() + outcome.unassigned.len(), 9);
        for assignment in outcome.committed() {
            let agent = agents.iter().find(|a| a.id() == assignment.agent_id).unwrap();
            assert_eq!(agent.active_task(), Some(assignment.task_id));
            assert!(assignment.path.is_contiguous());
        }
    }
}

#[cfg(test)]
mod generator_tests {
    use super::*;

    #[test]
    fn test_same_seed_same_tasks() {
        let env = Environment::new(6, 6, vec![c(2, 2)], vec![]).unwrap();
        let agents = vec![Agent::new(1, c(0, 0))];

        let a = TaskGenerator::seeded(42, 1).generate(5, &env, &agents);
        let b = TaskGenerator::seeded(42, 1).generate(5, &env, &agents);

        assert_eq!(a, b);
        assert_eq!(a.iter().map(|t| t.id()).collect::<Vec<_>>(), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_generated_cells_are_free() {
        let env = Environment::new(4, 4, vec![c(1, 1), c(2, 2)], vec![]).unwrap();
        let agents = vec![Agent::new(1, c(0, 0)), Agent::new(2, c(3, 3))];
        let mut generator = TaskGenerator::seeded(3, 100);

        for task in generator.generate(20, &env, &agents) {
            for cell in [task.pickup(), task.delivery()] {
                assert!(env.is_valid(&cell));
                assert!(agents.iter().all(|a| a.location() != cell));
            }
            assert_ne!(task.pickup(), task.delivery());
        }
    }

    #[test]
    fn test_generator_stops_when_task_ids_run_out() {
        let env = Environment::open(4, 4).unwrap();
        let mut generator = TaskGenerator::seeded(5, u32::MAX - 1);

        let tasks = generator.generate(5, &env, &[]);

        assert_eq!(tasks.iter().map(|t| t.id()).collect::<Vec<_>>(), vec![u32::MAX - 1, u32::MAX]);
        assert!(generator.next_task(&env, &[]).is_none());
    }

    #[test]
    fn test_crowded_grid_yields_no_task() {
        let env = Environment::new(2, 1, vec![c(1, 0)], vec![]).unwrap();
        let mut generator = TaskGenerator::seeded(1, 1);

        assert!(generator.next_task(&env, &[]).is_none());
        assert_eq!(generator.random_free_cell(&env, &[]), Some(c(0, 0)));
        assert!(generator.random_free_cell(&env, &[Agent::new(1, c(0, 0))]).is_none());
        assert!(generator.generate(3, &env, &[]).is_empty());
    }
}
