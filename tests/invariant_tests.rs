//! Safety invariants checked after every single step of a busy simulation

use intersection_sim::simulation::{
    ArrivalGenerator, Direction, IntersectionConfig, Light, ProcessId, Simulation, VehicleStatus,
};

const HORIZON: u64 = 300;

fn busy_simulation(seed: u64) -> Simulation {
    let mut sim = Simulation::new(IntersectionConfig::default()).unwrap();
    let mut generator = ArrivalGenerator::new(seed, 0.6, 1).unwrap();
    sim.add_vehicles(generator.generate(120)).unwrap();
    sim
}

/// Step through the simulation, calling `check` after every wake-up
fn sweep(sim: &mut Simulation, mut check: impl FnMut(&Simulation)) {
    while sim.peek().is_some_and(|next| next < HORIZON) {
        assert!(sim.step());
        check(sim);
    }
}

#[test]
fn test_at_most_one_direction_green() {
    for seed in [1, 7, 42] {
        let mut sim = busy_simulation(seed);
        sweep(&mut sim, |sim| {
            let snapshot = sim.snapshot();
            assert!(
                snapshot.green_count() <= 1,
                "t={}: {} directions green",
                snapshot.time,
                snapshot.green_count()
            );
        });
    }
}

#[test]
fn test_crossing_vehicle_holds_gate_on_green_approach() {
    let mut sim = busy_simulation(3);
    sweep(&mut sim, |sim| {
        for direction in Direction::ALL {
            let crossing: Vec<_> = sim
                .vehicles()
                .filter(|v| v.source == direction && v.status == VehicleStatus::Crossing)
                .collect();
            assert!(crossing.len() <= 1, "t={}: two vehicles crossing", sim.now());

            if let Some(vehicle) = crossing.first() {
                assert_eq!(sim.intersection().light(direction), Light::Green);
                assert!(sim
                    .intersection()
                    .gate(direction)
                    .is_held_by(ProcessId::Vehicle(vehicle.id)));
            }
        }
    });
}

#[test]
fn test_queue_membership_matches_vehicle_lifecycle() {
    let mut sim = busy_simulation(11);
    sweep(&mut sim, |sim| {
        for vehicle in sim.vehicles() {
            for direction in Direction::ALL {
                let count = sim
                    .intersection()
                    .queue(direction)
                    .iter()
                    .filter(|q| q.id == vehicle.id)
                    .count();
                let expected = usize::from(vehicle.is_queued() && direction == vehicle.source);
                assert_eq!(
                    count, expected,
                    "t={}: vehicle {} appears {} times in {} queue",
                    sim.now(),
                    vehicle.id,
                    count,
                    direction
                );
            }
        }
    });
}

#[test]
fn test_crossings_complete_before_light_turns_red() {
    let mut sim = busy_simulation(5);
    sim.run(HORIZON).unwrap();

    let crossing_duration = sim.config().crossing_duration;
    for vehicle in sim.vehicles().filter(|v| v.status == VehicleStatus::Done) {
        let (Some(start), Some(end)) = (vehicle.wait_end, vehicle.completed_at) else {
            panic!("vehicle {} done without timestamps", vehicle.id);
        };
        assert_eq!(end - start, crossing_duration);

        let interrupted = sim.signal_history().iter().any(|c| {
            c.direction == vehicle.source && c.light == Light::Red && start < c.time && c.time < end
        });
        assert!(!interrupted, "vehicle {} interrupted mid-crossing", vehicle.id);
    }

    for direction in Direction::ALL {
        let mut intervals: Vec<_> = sim
            .vehicles()
            .filter(|v| v.source == direction)
            .filter_map(|v| Some((v.wait_end?, v.completed_at?)))
            .collect();
        intervals.sort();
        for pair in intervals.windows(2) {
            assert!(pair[0].1 <= pair[1].0, "overlapping crossings on {}", direction);
        }
    }
}

#[test]
fn test_lights_alternate_green_then_red_per_direction() {
    let mut sim = busy_simulation(9);
    sim.run(HORIZON).unwrap();

    let history = sim.signal_history();
    assert!(!history.is_empty());
    for pair in history.windows(2) {
        assert!(pair[0].time <= pair[1].time);
    }
    // Changes come as green/red pairs on the same direction
    for phase in history.chunks(2) {
        assert_eq!(phase[0].light, Light::Green);
        if let Some(red) = phase.get(1) {
            assert_eq!(red.light, Light::Red);
            assert_eq!(red.direction, phase[0].direction);
        }
    }
}
