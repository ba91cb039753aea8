use orb_visualizer::config::{AgentState, VolumeMode};
use orb_visualizer::palette::{Rgb, parse_stop_list};
use orb_visualizer::rng::SeededRng;
use orb_visualizer::visual::{FrameInputs, OrbEngine, clamp01};

const BLUE: &str = "#A3E4FF";
const PINK: &str = "#F6A9FF";

fn close(a: f32, b: f32, tol: f32) -> bool {
    (a - b).abs() <= tol
}

fn rgb_close(a: Rgb, b: Rgb, tol: f32) -> bool {
    close(a.r, b.r, tol) && close(a.g, b.g, tol) && close(a.b, b.b, tol)
}

// ── clamp01 ─────────────────────────────────────────────────────────────────

#[test]
fn clamp01_bounds_finite_values() {
    for &(x, want) in &[
        (-1.0f32, 0.0f32),
        (0.0, 0.0),
        (0.25, 0.25),
        (1.0, 1.0),
        (7.5, 1.0),
    ] {
        assert_eq!(clamp01(x), want, "clamp01({x})");
    }
}

#[test]
fn clamp01_is_monotonic() {
    let samples = [-2.0f32, -0.5, 0.0, 0.1, 0.5, 0.9, 1.0, 1.5, 3.0];
    for pair in samples.windows(2) {
        assert!(clamp01(pair[0]) <= clamp01(pair[1]));
    }
}

#[test]
fn clamp01_maps_non_finite_to_zero() {
    assert_eq!(clamp01(f32::NAN), 0.0);
    assert_eq!(clamp01(f32::INFINITY), 0.0);
    assert_eq!(clamp01(f32::NEG_INFINITY), 0.0);
}

// ── seeded rng ──────────────────────────────────────────────────────────────

#[test]
fn same_seed_yields_same_stream() {
    let mut a = SeededRng::new(42);
    let mut b = SeededRng::new(42);
    for _ in 0..7 {
        assert_eq!(a.next_f32(), b.next_f32());
    }
}

#[test]
fn different_seeds_diverge() {
    let mut a = SeededRng::new(42);
    let mut b = SeededRng::new(43);
    let mut any_diff = false;
    for _ in 0..7 {
        any_diff |= a.next_f32() != b.next_f32();
    }
    assert!(any_diff, "seeds 42 and 43 produced identical 7-draw streams");
}

#[test]
fn rng_output_stays_in_unit_interval() {
    let mut rng = SeededRng::new(0xDEAD_BEEF);
    for _ in 0..1000 {
        let v = rng.next_f32();
        assert!((0.0..1.0).contains(&v), "out of range: {v}");
    }
}

#[test]
fn seeded_engines_share_lobe_offsets() {
    let a = OrbEngine::new(Some(7), &[]);
    let b = OrbEngine::new(Some(7), &[]);
    assert_eq!(a.offsets(), b.offsets());
    for &o in a.offsets() {
        assert!((0.0..std::f32::consts::TAU).contains(&o));
    }
}

// ── smoothing & fade-in ─────────────────────────────────────────────────────

#[test]
fn smoothing_error_contracts_strictly() {
    let mut engine = OrbEngine::new(Some(1), &[]);
    let inputs = FrameInputs {
        volume_mode: VolumeMode::Manual,
        manual_input: Some(0.8),
        manual_output: Some(0.1),
        ..Default::default()
    };

    let mut err_in = (engine.state().input_level - 0.8f32).abs();
    let mut err_out = (engine.state().output_level - 0.1f32).abs();
    for _ in 0..40 {
        engine.advance(1.0 / 60.0, &inputs);
        let next_in = (engine.state().input_level - 0.8f32).abs();
        let next_out = (engine.state().output_level - 0.1f32).abs();
        assert!(next_in < err_in, "input error did not contract");
        assert!(next_out < err_out, "output error did not contract");
        err_in = next_in;
        err_out = next_out;
    }
}

#[test]
fn opacity_fades_in_within_half_a_simulated_second() {
    let mut engine = OrbEngine::new(Some(1), &[]);
    let inputs = FrameInputs::default();

    // Irregular frame cadence; deltas sum to 0.5 s.
    let deltas = [0.05f32, 0.001, 0.2, 0.013, 0.1, 0.036, 0.1];
    assert!((deltas.iter().sum::<f32>() - 0.5).abs() < 1e-6);

    let mut prev = engine.state().opacity;
    assert_eq!(prev, 0.0);
    for dt in deltas {
        engine.advance(dt, &inputs);
        let cur = engine.state().opacity;
        assert!(cur >= prev, "opacity regressed");
        assert!(cur <= 1.0);
        prev = cur;
    }
    assert!(
        close(engine.state().opacity, 1.0, 1e-5),
        "opacity {} after 0.5 simulated seconds",
        engine.state().opacity
    );

    // Never regresses afterwards either.
    engine.advance(1.0, &inputs);
    assert_eq!(engine.state().opacity, 1.0);
}

#[test]
fn non_finite_delta_is_ignored() {
    let mut engine = OrbEngine::new(Some(1), &[]);
    let before = engine.state().time;
    engine.advance(f32::NAN, &FrameInputs::default());
    assert_eq!(engine.state().time, before);
}

// ── scenario A: auto listening ──────────────────────────────────────────────

#[test]
fn listening_auto_mode_oscillates_within_waveform_bounds() {
    let stops = parse_stop_list(&format!("{BLUE},{PINK}"));
    assert_eq!(stops.len(), 2);

    let mut engine = OrbEngine::new(Some(42), &stops);
    let inputs = FrameInputs {
        agent_state: AgentState::Listening,
        volume_mode: VolumeMode::Auto,
        stops: &stops,
        ..Default::default()
    };

    for frame in 0..60 {
        engine.advance(1.0 / 60.0, &inputs);
        // The listening waveform is 0.55 +/- 0.35; the smoothed level can
        // only lag it, never overshoot the band. The level starts at 0 so
        // the bound holds once the filter has warmed up.
        if frame >= 20 {
            let level = engine.state().input_level;
            assert!(
                close(level, 0.55, 0.35 + 1e-4),
                "input level {level} left the listening band at frame {frame}"
            );
        }
    }

    // Output target is the constant 0.45; after 60 smoothing steps the
    // residual is geometric and tiny.
    assert!(close(engine.state().output_level, 0.45, 1e-3));

    // Slots were seeded from the stops and their targets never moved.
    for (i, slot) in engine.state().color_slots.iter().enumerate() {
        assert!(
            rgb_close(*slot, stops[i % 2], 1e-4),
            "slot {i} drifted from its cycled stop"
        );
    }
}

// ── scenario B: manual extremes ─────────────────────────────────────────────

#[test]
fn manual_volumes_converge_geometrically() {
    let mut engine = OrbEngine::new(Some(42), &[]);
    let inputs = FrameInputs {
        volume_mode: VolumeMode::Manual,
        manual_input: Some(1.0),
        manual_output: Some(0.0),
        ..Default::default()
    };

    for _ in 0..30 {
        engine.advance(1.0 / 60.0, &inputs);
    }

    // (1 - 0.2)^30 ~= 0.00124.
    assert!(
        engine.state().input_level >= 1.0 - 0.0013,
        "input level {} short of geometric bound",
        engine.state().input_level
    );
    assert!(
        engine.state().output_level <= 0.0013,
        "output level {} above geometric bound",
        engine.state().output_level
    );
}

#[test]
fn manual_fallback_chain_prefers_first_present_source() {
    let mk = |manual, live, pulled| FrameInputs {
        volume_mode: VolumeMode::Manual,
        manual_input: manual,
        live_input: live,
        pulled_input: pulled,
        ..Default::default()
    };

    // Converge on each configuration and compare the steady state.
    let steady = |inputs: FrameInputs| {
        let mut engine = OrbEngine::new(Some(5), &[]);
        for _ in 0..200 {
            engine.advance(1.0 / 60.0, &inputs);
        }
        engine.state().input_level
    };

    assert!(close(steady(mk(Some(0.9), Some(0.5), Some(0.2))), 0.9, 1e-3));
    assert!(close(steady(mk(None, Some(0.5), Some(0.2))), 0.5, 1e-3));
    assert!(close(steady(mk(None, None, Some(0.2))), 0.2, 1e-3));
    assert!(close(steady(mk(None, None, None)), 0.0, 1e-3));
}

#[test]
fn manual_garbage_volume_degrades_to_zero() {
    let mut engine = OrbEngine::new(Some(5), &[]);
    let inputs = FrameInputs {
        volume_mode: VolumeMode::Manual,
        manual_input: Some(f32::NAN),
        manual_output: Some(17.0),
        ..Default::default()
    };
    for _ in 0..100 {
        engine.advance(1.0 / 60.0, &inputs);
    }
    assert!(engine.state().input_level.abs() < 1e-3);
    assert!(close(engine.state().output_level, 1.0, 1e-3));
}

// ── scenario C: surface loss ────────────────────────────────────────────────

#[test]
fn surface_rebuild_preserves_animation_state() {
    use orb_visualizer::render::{Frame, HalfBlockRenderer, Renderer};

    let stops = parse_stop_list(&format!("{BLUE},{PINK}"));
    let mut engine = OrbEngine::new(Some(42), &stops);
    let inputs = FrameInputs {
        agent_state: AgentState::Talking,
        stops: &stops,
        ..Default::default()
    };
    for _ in 0..45 {
        engine.advance(1.0 / 60.0, &inputs);
    }

    let opacity = engine.state().opacity;
    let phase = engine.state().phase;
    let offsets = *engine.offsets();
    assert!(opacity > 0.0 && phase > 0.1);

    let w = 16usize;
    let h = 16usize;
    let mut before = vec![0u8; w * h * 4];
    engine.render(w, h, &mut before);

    fn coerce<F: for<'a> Fn(&'a [u8]) -> Frame<'a>>(f: F) -> F {
        f
    }
    let make_frame = coerce(|pixels: &[u8]| Frame {
        term_cols: w as u16,
        term_rows: (h / 2 + 1) as u16,
        visual_rows: (h / 2) as u16,
        pixel_width: w,
        pixel_height: h,
        pixels_rgba: pixels,
        background: (0, 0, 0),
        hud: "",
        hud_rows: 0,
    });

    // Losing the surface means the renderer is rebuilt; nothing in the
    // engine is re-seeded or reset.
    let mut lost = Vec::new();
    HalfBlockRenderer::new()
        .render(&make_frame(&before), &mut lost)
        .unwrap();
    let mut renderer = HalfBlockRenderer::new();

    assert_eq!(engine.state().opacity, opacity);
    assert_eq!(engine.state().phase, phase);
    assert_eq!(*engine.offsets(), offsets);

    let mut after = vec![0u8; w * h * 4];
    engine.render(w, h, &mut after);
    assert_eq!(before, after, "render diverged across surface rebuild");

    let mut resumed = Vec::new();
    renderer.render(&make_frame(&after), &mut resumed).unwrap();
    assert!(!resumed.is_empty());
}
