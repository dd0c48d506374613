use anyhow::{bail, Context, Result};
use gallery::{builtin_demos, mode_label, resolve_demo, run_demo, DemoHandle, UniformInput};
use surface::{FixedStepScheduler, HeadlessContext, ResourceCounts, ShaderStage, SurfaceSize};
use tracing_subscriber::EnvFilter;

use crate::cli::{CheckArgs, FailStage, InfoArgs, ListArgs, SoakArgs};

const FRAME_STEP_SECONDS: f32 = 1.0 / 60.0;

pub fn initialise_tracing(directive: Option<&str>) {
    let filter = match directive {
        Some(spec) => EnvFilter::new(spec),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

pub fn list(args: ListArgs) -> Result<()> {
    let demos = builtin_demos();
    if args.json {
        let entries: Vec<_> = demos.iter().map(|demo| demo.metadata()).collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    println!("Bundled demos:");
    for demo in &demos {
        println!("  {:<10} {}", demo.name, demo.summary);
    }
    Ok(())
}

pub fn info(args: InfoArgs) -> Result<()> {
    let handle = DemoHandle::from_input(&args.demo);
    let demo = resolve_demo(&handle)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&demo.metadata())?);
        return Ok(());
    }

    println!("Demo '{}'", demo.name);
    println!("  summary:    {}", demo.summary);
    println!("  source:     {}", describe_handle(&handle));
    println!(
        "  geometry:   {} vertices, {} components each",
        demo.geometry.vertex_count(),
        demo.geometry.components_per_vertex
    );
    println!("  attribute:  {}", demo.attribute);
    println!("  mode:       {}", mode_label(demo.mode));
    println!(
        "  clear:      [{:.2}, {:.2}, {:.2}, {:.2}]",
        demo.clear[0], demo.clear[1], demo.clear[2], demo.clear[3]
    );
    if demo.uniforms.is_empty() {
        println!("  uniforms:   (none)");
    } else {
        println!("  uniforms:");
        for binding in &demo.uniforms {
            println!("    {:<14} <- {}", binding.name, input_label(&binding.input));
        }
    }
    Ok(())
}

pub fn check(args: CheckArgs) -> Result<()> {
    let handle = DemoHandle::from_input(&args.demo);
    let demo = resolve_demo(&handle)?;
    let issues = demo.validate();
    if issues.is_empty() {
        println!("{}: ok", demo.name);
        return Ok(());
    }

    println!("{}: {} issue(s)", demo.name, issues.len());
    for issue in &issues {
        println!("  - {issue}");
    }
    bail!("demo '{}' is not runnable", demo.name);
}

pub fn soak(args: SoakArgs) -> Result<()> {
    let handle = DemoHandle::from_input(&args.demo);
    let demo = resolve_demo(&handle)?;
    let (width, height) = args.size;
    let gl = HeadlessContext::with_size(SurfaceSize::new(width, height));
    arm_failure(&gl, args.fail_stage);

    let mut scheduler = FixedStepScheduler::new(args.frames, FRAME_STEP_SECONDS);
    let outcome = run_demo(&gl, &demo, &mut scheduler);

    print_soak_report(&demo.name, &gl);

    let live = gl.live();
    match outcome {
        Ok(report) => {
            if live != ResourceCounts::default() {
                bail!(
                    "teardown left {} shaders, {} programs, {} buffers live",
                    live.shaders,
                    live.programs,
                    live.buffers
                );
            }
            tracing::info!(
                demo = %report.demo,
                frames = report.frames_rendered,
                "soak finished clean"
            );
            Ok(())
        }
        Err(err) => {
            // A failed link leaves the program for the host context to
            // reclaim; every other class must still balance.
            let allowed_programs = u32::from(matches!(args.fail_stage, Some(FailStage::Link)));
            if live.shaders != 0 || live.buffers != 0 || live.programs > allowed_programs {
                bail!(
                    "teardown after failure left {} shaders, {} programs, {} buffers live",
                    live.shaders,
                    live.programs,
                    live.buffers
                );
            }
            if args.fail_stage.is_some() {
                println!("Injected failure surfaced: {err}");
                if let Some(log) = err.diagnostic_log() {
                    println!("  log: {log}");
                }
                Ok(())
            } else {
                Err(err).context(format!("demo '{}' failed during soak", demo.name))
            }
        }
    }
}

fn arm_failure(gl: &HeadlessContext, stage: Option<FailStage>) {
    match stage {
        Some(FailStage::Vertex) => {
            gl.fail_compile(ShaderStage::Vertex, "injected vertex compile failure")
        }
        Some(FailStage::Fragment) => {
            gl.fail_compile(ShaderStage::Fragment, "injected fragment compile failure")
        }
        Some(FailStage::Link) => gl.fail_link("injected link failure"),
        None => {}
    }
}

fn print_soak_report(name: &str, gl: &HeadlessContext) {
    let created = gl.created();
    let deleted = gl.deleted();
    println!("Soak report for '{name}':");
    println!("  draws:     {}", gl.draw_calls().len());
    println!("  uniforms:  {}", gl.uniform_writes().len());
    println!(
        "  shaders:   {} created, {} deleted",
        created.shaders, deleted.shaders
    );
    println!(
        "  programs:  {} created, {} deleted",
        created.programs, deleted.programs
    );
    println!(
        "  buffers:   {} created, {} deleted",
        created.buffers, deleted.buffers
    );
}

fn describe_handle(handle: &DemoHandle) -> String {
    match handle {
        DemoHandle::Builtin(name) => format!("builtin '{name}'"),
        DemoHandle::LocalPack(path) => format!("pack {}", path.display()),
    }
}

fn input_label(input: &UniformInput) -> String {
    match input {
        UniformInput::Time => "time".to_string(),
        UniformInput::Resolution => "resolution".to_string(),
        UniformInput::Constant(value) => format!("constant {value}"),
    }
}
