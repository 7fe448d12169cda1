//! Two-stage converter optimized end to end with the reference models

use pcx_algo::models::{ConverterStage, MagneticCore, SwitchDevice, VoltageRef, Wire};
use pcx_algo::{combine_series, scale_modules, Optimizer, SearchConfig, SweepVariable};
use pcx_core::{Convention, DesignPoint, FrontierMode, ParetoFrontier};

fn switch(name: &str, rated_voltage_v: f64, rated_current_a: f64, on_resistance_ohm: f64) -> SwitchDevice {
    SwitchDevice {
        name: name.into(),
        rated_voltage_v,
        rated_current_a,
        on_resistance_ohm,
        resistance_tempco: 0.006,
        switching_energy_j: 80e-6,
        thermal_resistance_k_per_w: 1.0,
        max_junction_c: 150.0,
        cost: 6.0,
        volume: 0.01,
        available: true,
    }
}

fn e65() -> MagneticCore {
    MagneticCore {
        name: "E65".into(),
        area_m2: 5.0e-4,
        path_length_m: 0.147,
        window_area_m2: 5.4e-4,
        relative_permeability: 2000.0,
        saturation_t: 0.4,
        steinmetz_k: 1.5,
        steinmetz_alpha: 1.4,
        steinmetz_beta: 2.5,
        cost: 9.0,
        volume: 0.08,
        available: true,
    }
}

fn litz() -> Wire {
    Wire {
        name: "awg14".into(),
        area_m2: 2.08e-6,
        resistance_per_m: 8.2e-3,
        cost_per_m: 0.4,
    }
}

fn front_end() -> ConverterStage {
    ConverterStage {
        name: "front".into(),
        input_voltage: VoltageRef::Fixed(800.0),
        output_voltage: VoltageRef::Bound("v_bus".into()),
        power_w: Some(1000.0),
        module_counts: vec![1],
        frequencies_hz: vec![50e3],
        max_parallel: 2,
        ripple_fraction: 0.3,
        inductance_h: None,
        fill_factor: 0.4,
        devices: vec![switch("sic1200", 1200.0, 10.0, 0.16)],
        cores: vec![e65()],
        wires: vec![litz()],
    }
}

fn dcdc() -> ConverterStage {
    ConverterStage {
        name: "dcdc".into(),
        input_voltage: VoltageRef::Bound("front.output_voltage".into()),
        output_voltage: VoltageRef::Fixed(48.0),
        power_w: Some(1000.0),
        module_counts: vec![1, 2],
        frequencies_hz: vec![50e3, 100e3],
        max_parallel: 2,
        ripple_fraction: 0.3,
        inductance_h: None,
        fill_factor: 0.4,
        devices: vec![
            switch("sic650a", 650.0, 30.0, 0.05),
            switch("sic650b", 650.0, 30.0, 0.03),
        ],
        cores: vec![e65()],
        wires: vec![litz()],
    }
}

#[test]
fn combine_worked_example() {
    // Loss frontiers of two stages, lifted to efficiency at a 1 kW base
    let loss_a = ParetoFrontier::from_points(
        Convention::Loss,
        FrontierMode::Pruning,
        [DesignPoint::new(10.0, 1.0, 100.0, vec!["x".into()]).unwrap()],
    );
    let loss_b = ParetoFrontier::from_points(
        Convention::Loss,
        FrontierMode::Pruning,
        [DesignPoint::new(5.0, 2.0, 50.0, vec!["y".into()]).unwrap()],
    );
    let mut a = ParetoFrontier::new(Convention::Efficiency);
    let mut b = ParetoFrontier::new(Convention::Efficiency);
    assert_eq!(scale_modules(&loss_a, 1, 1000.0, &mut a).unwrap(), 1);
    assert_eq!(scale_modules(&loss_b, 1, 1000.0, &mut b).unwrap(), 1);
    assert!((a.points()[0].primary() - 0.99).abs() < 1e-12);
    assert!((b.points()[0].primary() - 0.995).abs() < 1e-12);

    let combined = combine_series(&a, &b).unwrap();
    assert_eq!(combined.len(), 1);
    let point = &combined.points()[0];
    assert!((point.primary() - 0.985).abs() < 1e-12);
    assert_eq!(point.volume(), 3.0);
    assert_eq!(point.cost(), 150.0);
    assert_eq!(point.tag(), ["x", "y"]);
    // Inputs untouched
    assert_eq!(a.len(), 1);
    assert_eq!(b.len(), 1);
    assert_eq!(loss_a.points()[0].primary(), 10.0);
}

#[test]
fn bundled_modules_compose_like_stages() {
    let module = ParetoFrontier::from_points(
        Convention::Loss,
        FrontierMode::Pruning,
        [DesignPoint::new(5.0, 0.5, 50.0, vec!["m".into()]).unwrap()],
    );
    let mut bundled = ParetoFrontier::new(Convention::Efficiency);
    scale_modules(&module, 2, 1000.0, &mut bundled).unwrap();
    let point = &bundled.points()[0];
    assert!((point.primary() - 0.99).abs() < 1e-12);
    assert_eq!(point.volume(), 1.0);
    assert_eq!(point.cost(), 100.0);
}

#[test]
fn two_stage_sweep_produces_tagged_frontier() {
    let optimizer = Optimizer::new(SearchConfig::default())
        .with_sweep(SweepVariable::new("v_bus", vec![400.0, 450.0]))
        .with_stage(front_end())
        .with_stage(dcdc());
    assert_eq!(optimizer.combination_count(), 2);
    assert_eq!(optimizer.stage_names(), ["front", "dcdc"]);

    let outcome = optimizer.run().unwrap();
    assert_eq!(outcome.combinations, 2);
    assert_eq!(outcome.skipped, 0);
    assert!(!outcome.frontier.is_empty());
    assert!(outcome.archive.len() >= outcome.frontier.len());
    assert_eq!(outcome.frontier.convention(), Convention::Efficiency);
    assert_eq!(outcome.archive.mode(), FrontierMode::Archival);

    for design in &outcome.frontier {
        assert!(design.primary() > 0.0 && design.primary() < 1.0);
        let tag = design.tag();
        assert!(tag[0].starts_with("v_bus="));
        assert_eq!(tag[1], "front");
        assert!(tag.iter().any(|field| field == "dcdc"));
    }

    // Every archived design is matched or beaten by the global frontier
    for archived in &outcome.archive {
        assert!(outcome
            .frontier
            .iter()
            .any(|kept| pcx_core::dominates(kept, archived, Convention::Efficiency)));
    }
}

#[test]
fn unreachable_stage_skips_every_combination() {
    let mut starved = dcdc();
    // Nothing in the catalogue survives the voltage margin
    starved.devices = vec![switch("lv100", 100.0, 30.0, 0.01)];

    let outcome = Optimizer::new(SearchConfig::default())
        .with_sweep(SweepVariable::new("v_bus", vec![400.0, 450.0]))
        .with_stage(front_end())
        .with_stage(starved)
        .run()
        .unwrap();
    assert_eq!(outcome.skipped, 2);
    assert!(outcome.frontier.is_empty());
    assert!(outcome.archive.is_empty());
}
