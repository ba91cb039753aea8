use orb_visualizer::palette::{
    DEFAULT_STOPS, PRESET_NAMES, Rgb, parse_stop_list, preset_stops, ramp6, resolve_stops,
};
use orb_visualizer::visual::{FrameInputs, OrbEngine};

fn rgb_close(a: Rgb, b: Rgb, tol: f32) -> bool {
    (a.r - b.r).abs() <= tol && (a.g - b.g).abs() <= tol && (a.b - b.b).abs() <= tol
}

// ── hex parsing ─────────────────────────────────────────────────────────────

#[test]
fn parses_long_and_short_hex() {
    let c = Rgb::from_hex("#A3E4FF").unwrap();
    assert!(rgb_close(c, Rgb::new(163.0 / 255.0, 228.0 / 255.0, 1.0), 1e-6));

    assert_eq!(Rgb::from_hex("A3E4FF"), Rgb::from_hex("#A3E4FF"));
    assert_eq!(Rgb::from_hex("#fff"), Rgb::from_hex("#ffffff"));
}

#[test]
fn rejects_malformed_hex() {
    for bad in ["", "#", "#12345", "#GGGGGG", "notacolor", "#1234567"] {
        assert!(Rgb::from_hex(bad).is_none(), "accepted {bad:?}");
    }
}

#[test]
fn stop_list_drops_garbage_tokens() {
    let stops = parse_stop_list("#A3E4FF, bogus, ,#F6A9FF,");
    assert_eq!(stops.len(), 2);
}

// ── resolver priority ───────────────────────────────────────────────────────

#[test]
fn explicit_wins_over_all_sources() {
    let explicit = parse_stop_list("#111111,#222222");
    let live = parse_stop_list("#333333,#444444");
    let got = resolve_stops(Some(&explicit), Some(&live), Some("ice"));
    assert_eq!(got, explicit);
}

#[test]
fn live_reference_wins_when_explicit_absent() {
    let live = parse_stop_list("#333333,#444444");
    let got = resolve_stops(None, Some(&live), Some("ice"));
    assert_eq!(got, live);
}

#[test]
fn preset_wins_when_explicit_and_live_absent() {
    let got = resolve_stops(None, None, Some("ice"));
    assert_eq!(got, preset_stops("ice").unwrap());
}

#[test]
fn default_when_nothing_usable() {
    assert_eq!(resolve_stops(None, None, None), DEFAULT_STOPS.to_vec());
}

#[test]
fn short_lists_fall_through_the_chain() {
    // One stop is not a usable source.
    let short = parse_stop_list("#111111");
    let live = parse_stop_list("#333333,#444444");
    assert_eq!(resolve_stops(Some(&short), Some(&live), None), live);
    assert_eq!(
        resolve_stops(Some(&short), Some(&short), None),
        DEFAULT_STOPS.to_vec()
    );
}

#[test]
fn unknown_preset_resolves_as_absent() {
    assert_eq!(
        resolve_stops(None, None, Some("no-such-preset")),
        DEFAULT_STOPS.to_vec()
    );
}

// ── preset catalog ──────────────────────────────────────────────────────────

#[test]
fn catalog_entries_have_two_to_six_stops() {
    for name in PRESET_NAMES {
        let stops = preset_stops(name).unwrap();
        assert!(
            (2..=6).contains(&stops.len()),
            "preset {name} has {} stops",
            stops.len()
        );
    }
    assert!(preset_stops("nope").is_none());
}

// ── cyclic slot indexing ────────────────────────────────────────────────────

#[test]
fn two_stop_list_cycles_across_six_slots() {
    let stops = parse_stop_list("#A3E4FF,#F6A9FF");
    // Start the slots away from the targets so convergence is observable.
    let mut engine = OrbEngine::new(Some(9), &[]);
    let inputs = FrameInputs {
        stops: &stops,
        ..Default::default()
    };

    for _ in 0..300 {
        engine.advance(1.0 / 60.0, &inputs);
    }

    for (i, slot) in engine.state().color_slots.iter().enumerate() {
        let want = stops[i % 2];
        assert!(
            rgb_close(*slot, want, 1e-3),
            "slot {i} did not converge to stop {}",
            i % 2
        );
    }
}

// ── ramp continuity ─────────────────────────────────────────────────────────

#[test]
fn ramp6_is_continuous_at_segment_boundaries() {
    let c = [
        Rgb::new(0.0, 0.0, 0.0),
        Rgb::new(0.9, 0.1, 0.2),
        Rgb::new(0.2, 0.8, 0.3),
        Rgb::new(0.1, 0.2, 0.9),
        Rgb::new(0.7, 0.7, 0.1),
        Rgb::new(1.0, 1.0, 1.0),
    ];
    let eps = 1e-4f32;
    for k in 1..=4 {
        let g = k as f32 / 6.0;
        let lo = ramp6(g - eps, &c);
        let hi = ramp6(g + eps, &c);
        assert!(
            rgb_close(lo, hi, 5e-3),
            "ramp jumps at {k}/6: {lo:?} vs {hi:?}"
        );
    }
}

#[test]
fn ramp6_hits_the_end_stops() {
    let c = [
        Rgb::new(0.1, 0.2, 0.3),
        Rgb::new(0.2, 0.3, 0.4),
        Rgb::new(0.3, 0.4, 0.5),
        Rgb::new(0.4, 0.5, 0.6),
        Rgb::new(0.5, 0.6, 0.7),
        Rgb::new(0.6, 0.7, 0.8),
    ];
    assert!(rgb_close(ramp6(0.0, &c), c[0], 1e-6));
    assert!(rgb_close(ramp6(1.0, &c), c[5], 1e-6));
}
