use std::env;

use anyhow::{Context, Result};
use log::info;

use neuro_sim::loss::{cross_entropy, mean_squared_error};
use neuro_sim::trajectory::{compare, descent_run, tune};
use neuro_sim::zones::Parameter;
use neuro_sim::{
    BackpropStepper, LogicGate, SessionConfig, Stage, TrajectoryRunner, gradient_chain, regularization,
    visualization,
};

fn main() -> Result<()> {
    env_logger::init();

    let config = match env::args().nth(1) {
        Some(path) => SessionConfig::load(&path).with_context(|| format!("loading config from '{path}'"))?,
        None => SessionConfig::default(),
    };
    info!("session config: {config:?}");

    println!("Single neuron:");
    let out = config.neuron.evaluate();
    println!("  z = {:.3}, {out}", out.z);
    match config.neuron.decision_boundary() {
        Ok(line) => println!("  boundary: x2 = {:.3}·x1 + {:.3}", line.slope, line.intercept),
        Err(e) => println!("  boundary: {e}"),
    }

    println!("\nLogic gates:");
    for gate in LogicGate::ALL {
        let rows: Vec<String> = gate
            .truth_table()
            .iter()
            .map(|r| format!("{}{}→{}", r.inputs[0], r.inputs[1], gate.evaluate(r.inputs[0], r.inputs[1])))
            .collect();
        println!("  {:<4} {}  ({})", gate.name(), rows.join(" "), gate.description());
    }

    println!("\nLosses:");
    let predictions = [0.9, 0.2, 0.8];
    let targets = [1.0, 0.0, 1.0];
    println!("  MSE           = {:.4}", mean_squared_error(&predictions, &targets)?);
    println!("  Cross-entropy = {:.4}", cross_entropy(&predictions, &targets)?);

    println!("\nGradient descent ({:?}, lr={}):", config.descent.mode, config.descent.learning_rate);
    let mut runner = TrajectoryRunner::new();
    runner.start(descent_run(
        config.descent.mode,
        config.descent.learning_rate,
        config.descent.seed,
    )?)?;
    let mut losses = Vec::new();
    while let Some(report) = runner.tick() {
        losses.extend(report.losses);
    }
    visualization::plot_loss(&losses);

    println!("\nOptimizer comparison on {}:", config.comparison.surface);
    let mut run = compare(
        config.comparison.surface,
        &config.comparison.selected,
        config.comparison.iterations,
    )?;
    run.run_to_end();
    for summary in run.summaries() {
        println!(
            "  {:<8} steps {:4}  loss {:10.5}  distance to optimum {:.4}",
            summary.kind.name(), summary.path_length, summary.final_loss, summary.distance_to_optimum
        );
    }
    visualization::plot_trajectories(&run);

    println!("\nHyperparameter tuning:");
    let outcome = tune(config.tuning.selected())?;
    println!("  {outcome}");

    println!("\nBackpropagation walk:");
    let mut stepper = BackpropStepper::default();
    while stepper.stage() != Stage::WeightGradients {
        let stage = stepper.advance();
        let v = stepper.values();
        println!("  [{}] {:<28} {}", stage.index(), stage.title(), stage.formula());
        if stage == Stage::OutputLoss {
            println!("      a2 = {:.3}, loss = {:.4}", v.a2, v.loss);
        }
    }
    if let Some(g) = stepper.parameter_gradients() {
        println!("      ∂L/∂w1 = {:.4}, ∂L/∂w2 = {:.4}", g.w1, g.w2);
    }

    println!();
    let flow = &config.gradient_flow;
    let chain = gradient_chain(flow.depth, flow.weight_scale, flow.activation)?;
    visualization::plot_gradient_chain(&chain);
    println!("  depth zone: {}", Parameter::Depth.classify(flow.depth as f64));

    println!("\nRegularization:");
    let reg = &config.regularization;
    let curves = regularization::overfitting_curves(reg.complexity, reg.data_size)?;
    println!(
        "  train {:.3}, validation {:.3}, gap {:.3}: {}",
        curves.final_train(),
        curves.final_validation(),
        curves.gap(),
        curves.generalization()
    );
    let l1 = regularization::l1_shrink(&reg.weights, reg.l1);
    println!(
        "  L1 (λ={}) zeroed {} of {} weights",
        reg.l1,
        l1.iter().filter(|&&w| w == 0.0).count(),
        l1.len()
    );
    let l2 = regularization::l2_decay(&reg.weights, reg.l2);
    print!("{}", visualization::render_weights(&reg.weights, &l2));
    let mask = regularization::dropout_network(reg.dropout, &mut rand::rng())?;
    println!("  dropout {}: {} active, {} dropped", reg.dropout, mask.active(), mask.dropped());
    let stop = regularization::early_stopping(reg.patience);
    println!(
        "  early stopping: best epoch {}, stop at {}, {} epochs saved",
        stop.best_epoch,
        stop.stop_epoch,
        stop.epochs_saved()
    );

    Ok(())
}
