//! Frame-level behavior of the coordinator with preset trees.

mod common;

use std::cell::Cell;
use std::rc::Rc;

use behavior_tree::{Behavior, Status};
use common::{SharedNavigator, Sight, drain, navigator};
use horde_core::{AgentId, HordeConfig, HordeId, Vec3};
use runtime::{
    AiContext, Archetype, Coordinator, CoordinatorConfig, Event, HordeEvent, ManualClock,
    Perception, PerceptionEvent, RuntimeError, Topic,
};

fn coordinator(sight: Sight, config: CoordinatorConfig) -> (Coordinator, SharedNavigator) {
    let nav = navigator();
    let coordinator = Coordinator::builder()
        .config(config)
        .perception(sight)
        .navigator(nav.clone())
        .build()
        .expect("collaborators configured");
    (coordinator, nav)
}

fn spawn_trio(coordinator: &mut Coordinator, config: HordeConfig) {
    let positions = [
        Vec3::ZERO,
        Vec3::new(3.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, 3.0),
    ];
    for (id, position) in (1..).zip(positions) {
        coordinator
            .spawn_agent(AgentId(id), position, config, Archetype::HordeGrunt)
            .unwrap();
    }
}

#[test]
fn grunts_form_a_horde_in_one_frame() {
    let (mut coordinator, nav) = coordinator(Sight::blind(), CoordinatorConfig::default());
    spawn_trio(&mut coordinator, HordeConfig::default());
    let mut rx = coordinator.subscribe(Topic::Horde);

    let report = coordinator.run_frame_at(0.0);

    assert_eq!(
        report.statuses,
        vec![
            (AgentId(1), Status::Success),
            (AgentId(2), Status::InProgress),
            (AgentId(3), Status::InProgress),
        ]
    );
    let horde = coordinator.manager().horde(HordeId(1)).unwrap();
    assert_eq!(horde.len(), 3);
    assert_eq!(horde.leader(), Some(AgentId(1)));
    assert_eq!(nav.borrow().targets.get(&AgentId(2)), Some(&Vec3::ZERO));
    assert_eq!(nav.borrow().targets.get(&AgentId(3)), Some(&Vec3::ZERO));

    let events = drain(&mut rx);
    assert_eq!(
        events[0],
        Event::Horde(HordeEvent::Created {
            horde: HordeId(1),
            founder: AgentId(1),
            rally_point: Vec3::ZERO,
            at: 0.0,
        })
    );
    let joined: Vec<AgentId> = events
        .iter()
        .filter_map(|event| match event {
            Event::Horde(HordeEvent::Joined { agent, .. }) => Some(*agent),
            _ => None,
        })
        .collect();
    assert_eq!(joined, vec![AgentId(1), AgentId(2), AgentId(3)]);
}

#[test]
fn agent_left_out_of_a_full_horde_goes_alone() {
    let config = CoordinatorConfig {
        roam_radius: 0.0,
        ..CoordinatorConfig::default()
    };
    let (mut coordinator, _nav) = coordinator(Sight::blind(), config);
    spawn_trio(&mut coordinator, HordeConfig::default().with_horde_max(2));

    let report = coordinator.run_frame_at(0.0);

    let left_out = coordinator.manager().agent(AgentId(3)).unwrap();
    assert!(left_out.is_unassigned());
    assert!(left_out.alone);
    assert_eq!(coordinator.manager().horde(HordeId(1)).unwrap().len(), 2);
    assert_eq!(coordinator.manager().hordes().len(), 1);
    // Roaming with a zero radius targets the agent's own position.
    assert_eq!(report.status_of(AgentId(3)), Some(Status::Success));
}

#[test]
fn leader_drags_rally_point_onto_visible_player() {
    let (mut coordinator, nav) = coordinator(Sight::unlimited(), CoordinatorConfig::default());
    spawn_trio(&mut coordinator, HordeConfig::default());
    let player = Vec3::new(10.0, 0.0, 0.0);
    coordinator.set_player_position(Some(player));
    let mut horde_rx = coordinator.subscribe(Topic::Horde);
    let mut sight_rx = coordinator.subscribe(Topic::Perception);

    let report = coordinator.run_frame_at(0.0);

    assert_eq!(report.count(Status::InProgress), 3);
    let horde = coordinator.manager().horde(HordeId(1)).unwrap();
    assert_eq!(horde.rally_point, player);
    assert_eq!(horde.len(), 3);
    assert!(
        nav.borrow()
            .targets
            .values()
            .all(|target| *target == player)
    );

    let moved = drain(&mut horde_rx)
        .into_iter()
        .filter(|event| matches!(event, Event::Horde(HordeEvent::RallyPointMoved { .. })))
        .count();
    assert_eq!(moved, 1);
    assert_eq!(drain(&mut sight_rx).len(), 3);
}

#[test]
fn lone_stalker_chases_then_loses_player() {
    let (mut coordinator, nav) = coordinator(Sight { range: 25.0 }, CoordinatorConfig::default());
    coordinator
        .spawn_agent(
            AgentId(1),
            Vec3::ZERO,
            HordeConfig::default(),
            Archetype::LoneStalker,
        )
        .unwrap();
    let mut rx = coordinator.subscribe(Topic::Perception);

    coordinator.set_player_position(Some(Vec3::new(20.0, 0.0, 0.0)));
    let report = coordinator.run_frame_at(0.0);
    assert_eq!(report.status_of(AgentId(1)), Some(Status::InProgress));
    assert_eq!(
        nav.borrow().targets.get(&AgentId(1)),
        Some(&Vec3::new(20.0, 0.0, 0.0))
    );
    let agent = coordinator.manager().agent(AgentId(1)).unwrap();
    assert!(agent.sees_player);
    assert!(agent.is_unassigned());

    coordinator.set_player_position(Some(Vec3::new(40.0, 0.0, 0.0)));
    coordinator.run_frame_at(0.1);
    let agent = coordinator.manager().agent(AgentId(1)).unwrap();
    assert!(!agent.sees_player);
    assert_eq!(agent.player_position, Some(Vec3::new(20.0, 0.0, 0.0)));

    assert_eq!(
        drain(&mut rx),
        vec![
            Event::Perception(PerceptionEvent::PlayerSpotted {
                agent: AgentId(1),
                player_position: Vec3::new(20.0, 0.0, 0.0),
                at: 0.0,
            }),
            Event::Perception(PerceptionEvent::PlayerLost {
                agent: AgentId(1),
                at: 0.1,
            }),
        ]
    );
}

#[test]
fn despawn_evicts_and_auto_disbands() {
    let config = CoordinatorConfig {
        disband_empty_hordes: true,
        ..CoordinatorConfig::default()
    };
    let (mut coordinator, nav) = coordinator(Sight::blind(), config);
    coordinator
        .spawn_agent(
            AgentId(7),
            Vec3::ZERO,
            HordeConfig::default().with_horde_min_size(1),
            Archetype::HordeGrunt,
        )
        .unwrap();
    coordinator.run_frame_at(0.0);
    let horde = coordinator.manager().agent(AgentId(7)).unwrap().horde().unwrap();
    let mut rx = coordinator.subscribe(Topic::Horde);

    let removed = coordinator.despawn_agent(AgentId(7)).unwrap();

    assert_eq!(removed.id, AgentId(7));
    assert!(removed.is_unassigned());
    assert!(coordinator.manager().hordes().is_empty());
    assert!(coordinator.archetype(AgentId(7)).is_none());
    assert!(nav.borrow().stops.contains(&AgentId(7)));
    assert_eq!(
        drain(&mut rx),
        vec![
            Event::Horde(HordeEvent::Left {
                agent: AgentId(7),
                horde,
                at: 0.0
            }),
            Event::Horde(HordeEvent::Disbanded { horde, at: 0.0 }),
        ]
    );
    assert!(coordinator.run_frame_at(1.0).statuses.is_empty());
}

#[test]
fn empty_hordes_survive_despawn_by_default() {
    let (mut coordinator, _nav) = coordinator(Sight::blind(), CoordinatorConfig::default());
    spawn_trio(&mut coordinator, HordeConfig::default());
    coordinator.run_frame_at(0.0);

    for id in 1..=3 {
        coordinator.despawn_agent(AgentId(id)).unwrap();
    }

    let horde = coordinator.manager().horde(HordeId(1)).unwrap();
    assert!(horde.is_empty());
    coordinator.manager().check_membership().unwrap();
}

#[test]
fn disbanding_releases_members() {
    let (mut coordinator, _nav) = coordinator(Sight::blind(), CoordinatorConfig::default());
    spawn_trio(&mut coordinator, HordeConfig::default());
    coordinator.run_frame_at(0.0);
    let mut rx = coordinator.subscribe(Topic::Horde);

    let horde = coordinator.disband_horde(HordeId(1)).unwrap();

    assert_eq!(horde.len(), 3);
    for id in 1..=3 {
        assert!(coordinator.manager().agent(AgentId(id)).unwrap().is_unassigned());
    }
    assert_eq!(drain(&mut rx).len(), 4);
    assert!(matches!(
        coordinator.disband_horde(HordeId(1)),
        Err(RuntimeError::Horde(_))
    ));
}

#[test]
fn later_agents_see_joins_from_earlier_in_the_frame() {
    let (mut coordinator, _nav) = coordinator(Sight::blind(), CoordinatorConfig::default());
    let cfg = HordeConfig::default().with_horde_max(2).with_horde_min_size(1);
    for id in [30, 10, 20] {
        coordinator
            .spawn_agent(AgentId(id), Vec3::ZERO, cfg, Archetype::HordeGrunt)
            .unwrap();
    }

    let report = coordinator.run_frame_at(0.0);

    let order: Vec<AgentId> = report.statuses.iter().map(|(id, _)| *id).collect();
    assert_eq!(order, vec![AgentId(10), AgentId(20), AgentId(30)]);
    let manager = coordinator.manager();
    assert_eq!(manager.agent(AgentId(20)).unwrap().horde(), Some(HordeId(1)));
    assert_eq!(manager.agent(AgentId(30)).unwrap().horde(), Some(HordeId(2)));
}

#[test]
fn run_frame_reads_the_clock() {
    let clock = ManualClock::new(0.0);
    let mut coordinator = Coordinator::builder()
        .perception(Sight::blind())
        .navigator(navigator())
        .clock(clock.clone())
        .build()
        .unwrap();

    clock.advance(1.5);
    let first = coordinator.run_frame();
    clock.advance(0.5);
    let second = coordinator.run_frame();

    assert_eq!((first.frame, first.now), (0, 1.5));
    assert_eq!((second.frame, second.now), (1, 2.0));
    assert_eq!(coordinator.frame(), 2);
}

#[test]
fn invalid_config_is_rejected_at_spawn() {
    let (mut coordinator, _nav) = coordinator(Sight::blind(), CoordinatorConfig::default());

    let err = coordinator
        .spawn_agent(
            AgentId(1),
            Vec3::ZERO,
            HordeConfig::default().with_horde_max(0),
            Archetype::HordeGrunt,
        )
        .unwrap_err();

    assert!(matches!(err, RuntimeError::InvalidConfig { agent, .. } if agent == AgentId(1)));
    assert!(coordinator.manager().agents().is_empty());
}

#[test]
fn builder_requires_navigator() {
    let err = Coordinator::builder()
        .perception(Sight::blind())
        .build()
        .err()
        .unwrap();
    assert!(matches!(err, RuntimeError::MissingCollaborator("navigator")));
}

struct Refuse;

impl Behavior<AiContext> for Refuse {
    fn tick(&self, _ctx: &mut AiContext) -> Status {
        Status::Failure
    }
}

#[test]
fn tree_override_replaces_preset() {
    let mut coordinator = Coordinator::builder()
        .perception(Sight::blind())
        .navigator(navigator())
        .tree(Archetype::Dummy, Box::new(Refuse))
        .build()
        .unwrap();
    coordinator
        .spawn_agent(AgentId(1), Vec3::ZERO, HordeConfig::default(), Archetype::Dummy)
        .unwrap();
    coordinator
        .spawn_agent(AgentId(2), Vec3::ZERO, HordeConfig::default(), Archetype::LoneStalker)
        .unwrap();

    let report = coordinator.run_frame_at(0.0);

    assert_eq!(report.status_of(AgentId(1)), Some(Status::Failure));
    assert_ne!(report.status_of(AgentId(2)), Some(Status::Failure));
}

/// Always sees the player and counts how often it was asked.
struct CountingSight {
    queries: Rc<Cell<usize>>,
}

impl Perception for CountingSight {
    fn can_see(&self, _agent: AgentId, _from: Vec3, _player: Vec3) -> bool {
        self.queries.set(self.queries.get() + 1);
        true
    }
}

#[test]
fn perception_is_asked_once_per_agent_per_tick() {
    let queries = Rc::new(Cell::new(0));
    let mut coordinator = Coordinator::builder()
        .perception(CountingSight {
            queries: Rc::clone(&queries),
        })
        .navigator(navigator())
        .build()
        .unwrap();
    spawn_trio(&mut coordinator, HordeConfig::default());
    coordinator
        .spawn_agent(AgentId(4), Vec3::ZERO, HordeConfig::default(), Archetype::LoneStalker)
        .unwrap();
    coordinator.set_player_position(Some(Vec3::new(10.0, 0.0, 0.0)));

    let report = coordinator.run_frame_at(0.0);
    assert_eq!(report.count(Status::InProgress), 4);
    assert_eq!(queries.get(), 4);

    coordinator.run_frame_at(0.5);
    assert_eq!(queries.get(), 8);
}
