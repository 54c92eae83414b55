use std::{env, fs, path::PathBuf, process::ExitCode};

use schema2class::{
    generate_from_path_with_fetch, join_units, AnnotationStyle, GenerationConfig, GenerationOutput,
};

#[derive(Debug, Default)]
struct GenerateOptions {
    config_path: Option<PathBuf>,
    out_dir: Option<PathBuf>,
    package: Option<String>,
    prefix: Option<String>,
    suffix: Option<String>,
    annotations: Option<AnnotationStyle>,
    constructors: bool,
    required_only: bool,
    no_tostring: bool,
    no_equals: bool,
    serializable: bool,
    parcelable: bool,
    cache_dir: Option<PathBuf>,
    update_refs: bool,
}

fn main() -> ExitCode {
    match run(env::args().collect()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            print_usage();
            ExitCode::FAILURE
        }
    }
}

fn run(args: Vec<String>) -> Result<(), String> {
    if args.len() < 3 {
        return Err("not enough arguments".to_string());
    }

    let command = args[1].as_str();
    let file = PathBuf::from(&args[2]);
    let options = parse_generate_options(&args[3..])?;

    match command {
        "generate" => run_generate(&file, &options),
        "validate" => run_validate(&file, &options),
        _ => Err(format!("unknown command '{command}'")),
    }
}

fn run_generate(file: &PathBuf, options: &GenerateOptions) -> Result<(), String> {
    let output = run_generation(file, options)?;

    match &options.out_dir {
        Some(out_dir) => {
            for unit in &output.units {
                let target = out_dir.join(unit.relative_path());
                if let Some(parent) = target.parent() {
                    fs::create_dir_all(parent)
                        .map_err(|e| format!("failed to create '{}': {e}", parent.display()))?;
                }
                fs::write(&target, &unit.source)
                    .map_err(|e| format!("failed to write '{}': {e}", target.display()))?;
            }
            println!(
                "wrote {} file(s) to {}",
                output.units.len(),
                out_dir.display()
            );
        }
        None => print!("{}", join_units(&output.units)),
    }

    Ok(())
}

fn run_validate(file: &PathBuf, options: &GenerateOptions) -> Result<(), String> {
    run_generation(file, options)?;
    println!("OK");
    Ok(())
}

fn run_generation(file: &PathBuf, options: &GenerateOptions) -> Result<GenerationOutput, String> {
    let config = build_config(options)?;
    let output = generate_from_path_with_fetch(
        file,
        &config,
        options.cache_dir.clone(),
        options.update_refs,
    )
    .map_err(|e| e.to_string())?;
    for warning in &output.warnings {
        eprintln!("warning: {warning}");
    }
    Ok(output)
}

fn build_config(options: &GenerateOptions) -> Result<GenerationConfig, String> {
    let mut config = match &options.config_path {
        Some(path) => GenerationConfig::from_path(path).map_err(|e| e.to_string())?,
        None => GenerationConfig::default(),
    };

    if let Some(package) = &options.package {
        config.target_package = package.clone();
    }
    if let Some(prefix) = &options.prefix {
        config.class_name_prefix = Some(prefix.clone());
    }
    if let Some(suffix) = &options.suffix {
        config.class_name_suffix = Some(suffix.clone());
    }
    if let Some(style) = options.annotations {
        config.annotation_style = style;
    }
    if options.constructors {
        config.include_constructors = true;
    }
    if options.required_only {
        config.constructors_required_properties_only = true;
    }
    if options.no_tostring {
        config.include_to_string = false;
    }
    if options.no_equals {
        config.include_hashcode_and_equals = false;
    }
    if options.serializable {
        config.serializable = true;
    }
    if options.parcelable {
        config.parcelable = true;
    }

    Ok(config)
}

fn parse_generate_options(args: &[String]) -> Result<GenerateOptions, String> {
    let mut options = GenerateOptions::default();
    let mut i = 0usize;

    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                options.config_path = Some(PathBuf::from(expect_value(args, &mut i)?));
            }
            "--out" => {
                options.out_dir = Some(PathBuf::from(expect_value(args, &mut i)?));
            }
            "--package" => {
                options.package = Some(expect_value(args, &mut i)?);
            }
            "--prefix" => {
                options.prefix = Some(expect_value(args, &mut i)?);
            }
            "--suffix" => {
                options.suffix = Some(expect_value(args, &mut i)?);
            }
            "--annotations" => {
                let raw = expect_value(args, &mut i)?;
                options.annotations =
                    Some(AnnotationStyle::parse(&raw).map_err(|e| e.to_string())?);
            }
            "--cache-dir" => {
                options.cache_dir = Some(PathBuf::from(expect_value(args, &mut i)?));
            }
            "--constructors" => options.constructors = true,
            "--required-only" => options.required_only = true,
            "--no-tostring" => options.no_tostring = true,
            "--no-equals" => options.no_equals = true,
            "--serializable" => options.serializable = true,
            "--parcelable" => options.parcelable = true,
            "--update-refs" => options.update_refs = true,
            other => return Err(format!("unknown option '{other}'")),
        }
        i += 1;
    }

    Ok(options)
}

fn expect_value(args: &[String], i: &mut usize) -> Result<String, String> {
    let flag = args[*i].clone();
    *i += 1;
    args.get(*i)
        .cloned()
        .ok_or_else(|| format!("option '{flag}' requires a value"))
}

fn print_usage() {
    eprintln!(
        "usage:
  schema2class generate <schema.json> [options]
  schema2class validate <schema.json> [options]

options:
  --package PKG          target package for generated classes
  --out DIR              write one .java file per class under DIR
  --config FILE          JSON config file layered over defaults
  --prefix P             class name prefix
  --suffix S             class name suffix
  --annotations STYLE    annotation style: none | jackson2
  --constructors         synthesize constructors
  --required-only        constructor parameters for required properties only
  --no-tostring          skip toString synthesis
  --no-equals            skip equals/hashCode synthesis
  --serializable         mark classes java.io.Serializable
  --parcelable           synthesize android.os.Parcelable support
  --cache-dir DIR        cache directory for remote schema refs
  --update-refs          refetch lockfile-pinned remote refs"
    );
}
