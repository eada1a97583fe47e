use bowlstim::{ClockHandle, ExperimentConfig, HeadlessSink, ManualClock, Presenter, StopCondition};

const EXPERIMENT: &str = r#"{
  "frame_rate": 60,
  "display": { "canvas": { "width": 72, "height": 36 } },
  "program": {
    "kind": "sequence",
    "timing": { "side_duration": 0.5, "sides_per_scene": 2, "bounce_deg": 30 },
    "scenes": [
      {
        "label": "bar",
        "foreground": { "kind": "bar_vertical", "width_deg": 20, "color": 0, "background": 255 },
        "background": { "kind": "uniform", "value": 120 }
      }
    ]
  }
}"#;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = ExperimentConfig::from_reader(EXPERIMENT.as_bytes())?;
    let manual = ManualClock::new(0.0);
    let clock = ClockHandle::manual(&manual);
    let plan = config.build(&clock)?;
    let sink = HeadlessSink::new(StopCondition::default()).with_manual_clock(manual);
    let mut presenter = Presenter::new(plan.program, plan.stage, sink, clock, plan.opts);

    let report = presenter.run()?;
    for e in &report.events {
        println!("{:>5} {} {:.3}s", e.kind.as_str(), e.id, e.duration);
    }
    println!("{}", report.throughput.summary());
    Ok(())
}
