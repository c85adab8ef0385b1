//! # Pavement Design CLI
//!
//! Terminal front end for the AASHTO 1993 flexible pavement design engine.
//!
//! ## Usage
//!
//! ```bash
//! pave_cli                                  # prompt for each input
//! pave_cli --input route9.json --json       # design from a file, print JSON
//! pave_cli --input route9.json --report route9.txt --pdf route9.pdf
//! pave_cli --sensitivity w18 --points 10    # prompt, then sweep W18
//! ```
//!
//! Errors are printed to stderr, followed by their JSON form, and the
//! process exits with status 1.

use std::env;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process;

use pave_core::calculations::design::{calculate, PavementDesignInput, PavementDesignResult};
use pave_core::calculations::layers::{DrainageCoefficients, LayerCoefficients};
use pave_core::calculations::sensitivity::{sweep_parameter, SensitivityParameter, DEFAULT_SWEEP_POINTS};
use pave_core::errors::{CalcError, CalcResult};
use pave_core::file_io::{load_design_input, load_settings, write_atomic};
use pave_core::pdf::render_design_pdf;
use pave_core::reliability::ReliabilityLevel;
use pave_core::report::{format_thousands, render_sensitivity_table, render_text_report};
use pave_core::settings::DesignSettings;

/// Parsed command-line options.
#[derive(Debug, Clone, PartialEq)]
struct CliOptions {
    input: Option<PathBuf>,
    settings: Option<PathBuf>,
    report: Option<PathBuf>,
    pdf: Option<PathBuf>,
    engineer: String,
    job_id: String,
    sensitivity: Option<SensitivityParameter>,
    points: usize,
    json: bool,
    help: bool,
}

impl Default for CliOptions {
    fn default() -> Self {
        CliOptions {
            input: None,
            settings: None,
            report: None,
            pdf: None,
            engineer: String::new(),
            job_id: String::new(),
            sensitivity: None,
            points: DEFAULT_SWEEP_POINTS,
            json: false,
            help: false,
        }
    }
}

fn parse_args(args: &[String]) -> Result<CliOptions, String> {
    let mut options = CliOptions::default();
    let mut i = 0;

    while i < args.len() {
        let flag = args[i].as_str();
        match flag {
            "-h" | "--help" => options.help = true,
            "--json" => options.json = true,
            "--input" | "--settings" | "--report" | "--pdf" | "--engineer" | "--job" | "--sensitivity"
            | "--points" => {
                let value = args
                    .get(i + 1)
                    .ok_or_else(|| format!("Missing value for {}", flag))?;
                match flag {
                    "--input" => options.input = Some(PathBuf::from(value)),
                    "--settings" => options.settings = Some(PathBuf::from(value)),
                    "--report" => options.report = Some(PathBuf::from(value)),
                    "--pdf" => options.pdf = Some(PathBuf::from(value)),
                    "--engineer" => options.engineer = value.clone(),
                    "--job" => options.job_id = value.clone(),
                    "--sensitivity" => {
                        options.sensitivity =
                            Some(SensitivityParameter::from_str_flexible(value).map_err(|e| e.to_string())?)
                    }
                    _ => {
                        options.points = value
                            .parse()
                            .map_err(|_| format!("Invalid point count: {}", value))?
                    }
                }
                i += 1;
            }
            _ => return Err(format!("Unknown option: {}", flag)),
        }
        i += 1;
    }

    Ok(options)
}

fn print_usage() {
    println!("pave_cli - AASHTO 1993 flexible pavement design");
    println!();
    println!("USAGE:");
    println!("    pave_cli [options]");
    println!();
    println!("OPTIONS:");
    println!("    --input <file.json>      Read design inputs instead of prompting");
    println!("    --settings <file.json>   Solver settings, minimum thicknesses, input ranges");
    println!("    --report <file.txt>      Write the text report");
    println!("    --pdf <file.pdf>         Write the PDF report");
    println!("    --engineer <name>        Engineer name for the PDF report");
    println!("    --job <id>               Job ID for the PDF report");
    println!("    --sensitivity <param>    Sweep w18, mr or reliability");
    println!("    --points <n>             Points in a w18/mr sweep (default {})", DEFAULT_SWEEP_POINTS);
    println!("    --json                   Print the result as JSON");
    println!("    -h, --help               Show this help message");
}

fn prompt_line(prompt: &str) -> Option<String> {
    print!("{}", prompt);
    io::stdout().flush().ok()?;

    let mut input = String::new();
    io::stdin().lock().read_line(&mut input).ok()?;
    let trimmed = input.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn prompt_f64(prompt: &str, default: f64) -> f64 {
    prompt_line(prompt)
        .and_then(|s| s.replace(',', "").parse().ok())
        .unwrap_or(default)
}

fn prompt_reliability(default: ReliabilityLevel) -> ReliabilityLevel {
    let levels: Vec<String> = ReliabilityLevel::ALL.iter().map(|l| l.percent().to_string()).collect();
    let prompt = format!("Reliability % ({}) [{}]: ", levels.join("/"), default.percent());
    match prompt_line(&prompt) {
        Some(answer) => match answer.trim_end_matches('%').parse::<f64>() {
            Ok(percent) => ReliabilityLevel::try_from(percent).unwrap_or_else(|e| {
                eprintln!("  {} - using {}", e, default);
                default
            }),
            Err(_) => default,
        },
        None => default,
    }
}

fn prompt_design_input() -> PavementDesignInput {
    let defaults = PavementDesignInput::default();
    let typical = LayerCoefficients::typical();
    let drainage = DrainageCoefficients::default();

    println!("Traffic and reliability");
    let w18 = prompt_f64(&format!("  W18 (ESAL) [{}]: ", format_thousands(defaults.w18)), defaults.w18);
    let reliability = prompt_reliability(defaults.reliability);
    let standard_error = prompt_f64(
        &format!("  Standard error So [{:.2}]: ", defaults.standard_error),
        defaults.standard_error,
    );

    println!("Serviceability");
    let initial_psi = prompt_f64(&format!("  Initial PSI p0 [{:.1}]: ", defaults.initial_psi), defaults.initial_psi);
    let terminal_psi = prompt_f64(&format!("  Terminal PSI pt [{:.1}]: ", defaults.terminal_psi), defaults.terminal_psi);

    println!("Subgrade");
    let subgrade_mr_psi = prompt_f64(
        &format!("  Resilient modulus MR (psi) [{}]: ", format_thousands(defaults.subgrade_mr_psi)),
        defaults.subgrade_mr_psi,
    );

    println!("Layer coefficients");
    let a1 = prompt_f64(&format!("  a1 asphalt [{:.2}]: ", typical.a1), typical.a1);
    let a2 = prompt_f64(&format!("  a2 base [{:.2}]: ", typical.a2), typical.a2);
    let a3 = prompt_f64(&format!("  a3 subbase [{:.2}]: ", typical.a3), typical.a3);

    println!("Drainage coefficients");
    let m2 = prompt_f64(&format!("  m2 base [{:.2}]: ", drainage.m2), drainage.m2);
    let m3 = prompt_f64(&format!("  m3 subbase [{:.2}]: ", drainage.m3), drainage.m3);
    println!();

    PavementDesignInput {
        label: String::new(),
        w18,
        reliability,
        standard_error,
        initial_psi,
        terminal_psi,
        subgrade_mr_psi,
        coefficients: LayerCoefficients::new(a1, a2, a3),
        drainage: DrainageCoefficients::new(m2, m3),
    }
}

fn print_result(input: &PavementDesignInput, result: &PavementDesignResult) {
    let t = &result.thicknesses;
    let c = &result.contributions;
    let [d1_cm, d2_cm, d3_cm] = t.to_centimeters();

    println!("═══════════════════════════════════════");
    println!("  FLEXIBLE PAVEMENT DESIGN RESULTS");
    println!("═══════════════════════════════════════");
    println!();
    println!("Design parameters:");
    println!("  W18:  {} ESAL", format_thousands(input.w18));
    println!("  R:    {}", input.reliability.display_name());
    println!("  So:   {:.2}", input.standard_error);
    println!("  ΔPSI: {:.2} ({:.1} - {:.1})", result.delta_psi, input.initial_psi, input.terminal_psi);
    println!("  MR:   {} psi", format_thousands(input.subgrade_mr_psi));
    println!();
    println!("Required SN = {:.2}", result.structural_number);
    println!(
        "  {} after {} iteration(s), residual {:.2e} {}",
        result.solver.termination.display_name(),
        result.solver.iterations,
        result.solver.residual,
        status_icon(result.solver.converged())
    );
    println!();
    println!("Layer thicknesses:");
    println!("  Asphalt concrete  D1 = {:5.1} in ({:5.1} cm)  SN1 = {:.2}", t.d1, d1_cm.value(), c.sn1);
    println!("  Base course       D2 = {:5.1} in ({:5.1} cm)  SN2 = {:.2}", t.d2, d2_cm.value(), c.sn2);
    println!("  Subbase           D3 = {:5.1} in ({:5.1} cm)  SN3 = {:.2}", t.d3, d3_cm.value(), c.sn3);
    println!();
    println!("═══════════════════════════════════════");
    println!(
        "  PROVIDED SN = {:.2} vs REQUIRED {:.2} {}",
        c.total,
        result.structural_number,
        status_icon(result.is_adequate())
    );
    println!("═══════════════════════════════════════");
}

fn status_icon(pass: bool) -> &'static str {
    if pass { "[OK]" } else { "[FAIL]" }
}

fn run(options: &CliOptions) -> CalcResult<()> {
    let settings = match &options.settings {
        Some(path) => load_settings(path)?,
        None => DesignSettings::default(),
    };

    let input = match &options.input {
        Some(path) => load_design_input(path)?,
        None => prompt_design_input(),
    };

    let result = calculate(&input, &settings)?;

    if options.json {
        let json = serde_json::to_string_pretty(&result)?;
        println!("{}", json);
    } else {
        print_result(&input, &result);
    }

    if let Some(parameter) = options.sensitivity {
        let curve = sweep_parameter(parameter, &input, &settings, options.points)?;
        println!();
        if options.json {
            println!("{}", serde_json::to_string_pretty(&curve)?);
        } else {
            print!("{}", render_sensitivity_table(&curve));
        }
    }

    if let Some(path) = &options.report {
        write_atomic(path, render_text_report(&input, &result).as_bytes())?;
        eprintln!("Report written to {}", path.display());
    }

    if let Some(path) = &options.pdf {
        let pdf = render_design_pdf(&input, &result, &options.engineer, &options.job_id)?;
        write_atomic(path, &pdf)?;
        eprintln!("PDF written to {}", path.display());
    }

    Ok(())
}

fn report_error(error: &CalcError) {
    eprintln!("Error: {}", error);
    if let Ok(json) = serde_json::to_string_pretty(error) {
        eprintln!();
        eprintln!("Error JSON:");
        eprintln!("{}", json);
    }
}

fn main() {
    let args: Vec<String> = env::args().skip(1).collect();

    let options = match parse_args(&args) {
        Ok(options) => options,
        Err(message) => {
            eprintln!("{}", message);
            eprintln!();
            print_usage();
            process::exit(1);
        }
    };

    if options.help {
        print_usage();
        return;
    }

    if let Err(e) = run(&options) {
        report_error(&e);
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_no_arguments() {
        let options = parse_args(&[]).unwrap();
        assert_eq!(options, CliOptions::default());
        assert_eq!(options.points, 20);
    }

    #[test]
    fn test_all_options() {
        let options = parse_args(&args(&[
            "--input", "route9.json",
            "--settings", "settings.json",
            "--report", "out.txt",
            "--pdf", "out.pdf",
            "--engineer", "J. Engineer",
            "--job", "25-001",
            "--sensitivity", "mr",
            "--points", "8",
            "--json",
        ]))
        .unwrap();

        assert_eq!(options.input, Some(PathBuf::from("route9.json")));
        assert_eq!(options.settings, Some(PathBuf::from("settings.json")));
        assert_eq!(options.report, Some(PathBuf::from("out.txt")));
        assert_eq!(options.pdf, Some(PathBuf::from("out.pdf")));
        assert_eq!(options.engineer, "J. Engineer");
        assert_eq!(options.job_id, "25-001");
        assert_eq!(options.sensitivity, Some(SensitivityParameter::SubgradeModulus));
        assert_eq!(options.points, 8);
        assert!(options.json);
    }

    #[test]
    fn test_missing_value() {
        let err = parse_args(&args(&["--input"])).unwrap_err();
        assert!(err.contains("--input"));
    }

    #[test]
    fn test_unknown_option() {
        assert!(parse_args(&args(&["--frobnicate"])).is_err());
        assert!(parse_args(&args(&["--sensitivity", "so"])).is_err());
        assert!(parse_args(&args(&["--points", "many"])).is_err());
    }

    #[test]
    fn test_help() {
        assert!(parse_args(&args(&["-h"])).unwrap().help);
    }
}
