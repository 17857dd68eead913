use crosswater_game::{
    CharacterId, CharacterKind, CrossingSession, GameOutcome, ScenarioConfig, Side, TickOutcome,
    ZoneId,
};

const FRAME: f64 = 0.5;

fn load_scenario(json: &str) -> ScenarioConfig {
    ScenarioConfig::from_json(json).unwrap()
}

fn waiting(session: &CrossingSession, kind: CharacterKind, count: usize) -> Vec<CharacterId> {
    let bank = ZoneId::bank(session.crossing().boat_side());
    let picked: Vec<CharacterId> = session
        .crossing()
        .roster()
        .ids_of_kind(kind)
        .into_iter()
        .filter(|id| session.crossing().zone_of(*id) == Some(bank))
        .take(count)
        .collect();
    assert_eq!(picked.len(), count, "not enough {kind}s on the {bank}");
    picked
}

/// One crossing: board, pull the lever, glide frame by frame, step off.
/// Every frame is checked for a premature outcome.
fn ferry(session: &mut CrossingSession, villagers: usize, killers: usize) -> TickOutcome {
    let mut riders = waiting(session, CharacterKind::Villager, villagers);
    riders.extend(waiting(session, CharacterKind::Killer, killers));
    for &id in &riders {
        assert!(session.request_move(id).is_applied(), "boarding {id}");
        let tick = session.tick(FRAME / 10.0);
        assert_eq!(tick.outcome, GameOutcome::Ongoing);
    }
    assert!(session.try_launch().is_applied());

    let departed = session.crossing().boat_side();
    loop {
        let tick = session.tick(FRAME);
        if let Some(side) = tick.arrived {
            assert_eq!(side, departed.opposite());
            if tick.outcome.is_terminal() {
                return tick;
            }
            break;
        }
        assert_eq!(tick.outcome, GameOutcome::Ongoing, "outcome during glide");
    }

    for &id in &riders {
        assert!(session.request_move(id).is_applied(), "landing {id}");
    }
    session.tick(FRAME / 10.0)
}

#[test]
fn express_boat_wins_in_seven_crossings() {
    let mut session =
        CrossingSession::new(load_scenario(include_str!("../data/express.json"))).unwrap();
    // VK> V< KK> K< VVV> K< KK>
    let plan = [(1, 1), (1, 0), (0, 2), (0, 1), (3, 0), (0, 1), (0, 2)];
    let mut latches = 0;
    let mut last = None;
    for (index, (villagers, killers)) in plan.into_iter().enumerate() {
        let tick = ferry(&mut session, villagers, killers);
        latches += usize::from(tick.newly_latched);
        if index + 1 < plan.len() {
            assert_eq!(tick.outcome, GameOutcome::Ongoing, "crossing {}", index + 1);
        }
        last = Some(tick);
    }
    let last = last.unwrap();
    assert_eq!(last.outcome, GameOutcome::Won);
    assert!(last.newly_latched);
    assert_eq!(latches, 1);
    assert_eq!(session.crossing().boat_side(), Side::Left);

    // Further ticks never report another latch.
    for _ in 0..10 {
        assert!(!session.tick(FRAME).newly_latched);
    }
    assert_eq!(session.outcome(), GameOutcome::Won);
    assert!(session.won_at().is_some());
}

#[test]
fn classic_boat_wins_in_eleven_crossings() {
    let mut session =
        CrossingSession::new(load_scenario(include_str!("../data/classic.json"))).unwrap();
    // KK> K< KK> K< VV> VK< VV> K< KK> K< KK>
    let plan = [
        (0, 2),
        (0, 1),
        (0, 2),
        (0, 1),
        (2, 0),
        (1, 1),
        (2, 0),
        (0, 1),
        (0, 2),
        (0, 1),
        (0, 2),
    ];
    let mut outcomes = Vec::new();
    for (villagers, killers) in plan {
        outcomes.push(ferry(&mut session, villagers, killers));
    }
    let (last, earlier) = outcomes.split_last().unwrap();
    assert!(earlier.iter().all(|tick| tick.outcome == GameOutcome::Ongoing));
    assert_eq!(last.outcome, GameOutcome::Won);
    assert_eq!(session.census().left.total(), 6);
}

#[test]
fn stranding_a_villager_loses_on_arrival() {
    let mut session =
        CrossingSession::new(load_scenario(include_str!("../data/classic.json"))).unwrap();
    let tick = ferry(&mut session, 1, 1);
    assert_eq!(tick.outcome, GameOutcome::Ongoing);
    // The villager rows back alone, then two villagers leave one behind
    // with two killers.
    let tick = ferry(&mut session, 1, 0);
    assert_eq!(tick.outcome, GameOutcome::Ongoing);
    let tick = ferry(&mut session, 2, 0);
    match tick.outcome {
        GameOutcome::Lost(reason) => {
            assert_eq!(reason.side, Side::Right);
            assert_eq!((reason.villagers, reason.killers), (1, 2));
        }
        other => panic!("expected a loss, got {other}"),
    }
    assert!(tick.newly_latched);
}
