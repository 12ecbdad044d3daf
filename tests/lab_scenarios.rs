// End-to-end lab scenarios driven through the public controller API

use approx::assert_abs_diff_eq;
use chem_lab_sim::entities::{
    BondSpec, BoundaryKind, BoundaryShape, BoundarySpec, HeatSourceSpec, HeatSourceUpdate, HeatTint,
    ParticleSpec,
};
use chem_lab_sim::material::MaterialPhase;
use chem_lab_sim::{SimConfig, Simulation};
use glam::DVec2;
use more_asserts::{assert_gt, assert_le, assert_lt};

const FRAME: f64 = 1.0 / 60.0;

#[test]
fn test_particle_bounces_on_container_floor() {
    println!("🧪 Dropping a particle into a 100x100 container");
    let config = SimConfig {
        gravity: DVec2::new(0.0, 50.0),
        ..SimConfig::default()
    };
    let mut sim = Simulation::new(config).expect("valid config");
    sim.add_boundary(
        BoundarySpec::container(BoundaryShape::rectangle(0.0, 0.0, 100.0, 100.0)).with_restitution(0.8),
    )
    .expect("container");
    let id = sim.add_particle(ParticleSpec::new(50.0, 50.0, 5.0)).expect("particle");

    let mut flips = 0;
    let mut last_vy = 0.0;
    for _ in 0..60 {
        sim.tick(FRAME);
        let p = sim.particle(id).expect("particle");
        assert_le!(p.position.y, 95.0 + 1e-9, "particle fell through the floor");
        if last_vy > 0.0 && p.velocity.y < 0.0 {
            flips += 1;
        }
        last_vy = p.velocity.y;
    }

    assert_abs_diff_eq!(sim.elapsed(), 1.0, epsilon = 1e-9);
    println!("   bounces observed: {}", flips);
    assert_gt!(flips, 0, "particle never bounced");
}

#[test]
fn test_particle_warms_near_heat_source() {
    println!("🔥 Warming a particle next to a 100°C burner");
    let mut sim = Simulation::default();
    sim.add_heat_source(HeatSourceSpec::new(0.0, 0.0, 50.0, 100.0)).expect("heat source");
    let id = sim.add_particle(ParticleSpec::new(10.0, 10.0, 2.0)).expect("particle");

    for _ in 0..5 {
        sim.tick(FRAME);
    }

    let temperature = sim.particle(id).expect("particle").temperature;
    println!("   temperature after 5 ticks: {:.2}°C", temperature);
    assert_gt!(temperature, 25.0);
    assert_lt!(temperature, 100.0);
}

#[test]
fn test_bond_pulls_particles_to_rest_length() {
    println!("🔗 Relaxing a bond stretched to twice its rest length");
    let mut sim = Simulation::default();
    let a = sim.add_particle(ParticleSpec::new(130.0, 150.0, 3.0)).expect("a");
    let b = sim.add_particle(ParticleSpec::new(170.0, 150.0, 3.0)).expect("b");
    sim.add_bond(BondSpec::new(a, b).with_rest_length(20.0)).expect("bond");

    let separation = |sim: &Simulation| {
        let pa = sim.particle(a).expect("a").position;
        let pb = sim.particle(b).expect("b").position;
        pa.distance(pb)
    };

    for _ in 0..10 {
        sim.tick(FRAME);
    }
    assert_lt!(separation(&sim), 40.0, "bond did not pull the particles together");

    let mut late_error: f64 = 0.0;
    for tick in 0..290 {
        sim.tick(FRAME);
        if tick >= 230 {
            late_error = late_error.max((separation(&sim) - 20.0).abs());
        }
    }

    let final_separation = separation(&sim);
    println!("   final separation: {:.3} (late error {:.3})", final_separation, late_error);
    assert_lt!((final_separation - 20.0).abs(), 3.0);
    assert_lt!(late_error, 20.0, "oscillation grew instead of settling");
}

#[test]
fn test_deactivated_heater_leaves_no_residual_heat() {
    let mut sim = Simulation::default();
    let heater = sim.add_heat_source(HeatSourceSpec::new(100.0, 100.0, 40.0, 300.0)).expect("heater");
    sim.tick(FRAME);
    assert_gt!(sim.temperature_at(110.0, 100.0), 25.0);

    assert_eq!(sim.update_heat_source(heater, HeatSourceUpdate::active(false)), Ok(true));
    sim.tick(FRAME);
    assert_eq!(sim.temperature_at(110.0, 100.0), 25.0);
    assert_eq!(sim.temperature_at(100.0, 100.0), 25.0);
}

#[test]
fn test_removing_bonded_particle_prunes_bond() {
    let mut sim = Simulation::default();
    let a = sim.add_particle(ParticleSpec::new(100.0, 100.0, 2.0)).expect("a");
    let b = sim.add_particle(ParticleSpec::new(120.0, 100.0, 2.0)).expect("b");
    let bond = sim.add_bond(BondSpec::new(a, b)).expect("bond");

    assert!(sim.remove_particle(b));
    sim.tick(FRAME);

    let snapshot = sim.snapshot();
    assert!(snapshot.bonds.iter().all(|x| x.id != bond));
    assert_eq!(snapshot.particles.len(), 1);
    assert_eq!(snapshot.diagnostics.pruned_bonds, 1);
}

#[test]
fn test_flask_bubbles_then_boils() {
    println!("⚗️  Heating a flask of water over a burner");
    let mut sim = Simulation::default();
    sim.add_boundary(BoundarySpec::container(BoundaryShape::circle(150.0, 150.0, 40.0)))
        .expect("flask");
    sim.add_boundary(BoundarySpec::new(
        BoundaryShape::rectangle(120.0, 195.0, 60.0, 10.0),
        BoundaryKind::Heater,
    ))
    .expect("hot plate");
    sim.add_heat_source(HeatSourceSpec::new(150.0, 150.0, 80.0, 400.0)).expect("burner");
    let ids: Vec<_> = (0..5)
        .map(|i| {
            sim.add_particle(ParticleSpec::new(135.0 + 7.0 * i as f64, 150.0, 2.0))
                .expect("water")
        })
        .collect();

    let mut bubbled = vec![false; ids.len()];
    for _ in 0..300 {
        sim.tick(FRAME);
        for (seen, &id) in bubbled.iter_mut().zip(&ids) {
            let p = sim.particle(id).expect("water");
            *seen |= p.bubbling;
            assert_le!(p.position.distance(DVec2::new(150.0, 150.0)), 38.0 + 0.02);
        }
    }

    println!("   bubbled: {:?}", bubbled);
    assert!(bubbled.iter().all(|&b| b), "every particle should bubble on its way to boiling");
    let snapshot = sim.snapshot();
    for id in ids {
        let p = snapshot.particle(id).expect("water");
        assert_eq!(p.phase, MaterialPhase::Gas);
        assert!(!p.bubbling);
        assert_eq!(p.heat_tint, HeatTint::Hot);
    }
}
