use clap::{Parser, Subcommand};
use qr_compare::config::{SessionConfig, pairs_file_from_env};
use qr_compare::session::runtime::{flash_text, result_text};
use qr_compare::session::{PresentationSink, Runtime};
use qr_compare::tools::feed::{LineDecoder, feed_lines};
use qr_compare::tools::{PairReport, evaluate_pairs, load_pairs, summarize};
use qr_compare::{CameraSource, Event, NormalizationMode, ScanSession, compare, normalize};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "qrcompare", version, about = "Compare scanned QR payloads")]
struct Cli {
    /// Print machine-readable JSON
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the canonical form of a payload
    Normalize {
        #[arg(long, default_value_t = NormalizationMode::Exact)]
        mode: NormalizationMode,
        text: String,
    },
    /// Compare two payloads (exit 0 on match, 1 otherwise)
    Compare {
        #[arg(long, default_value_t = NormalizationMode::Exact)]
        mode: NormalizationMode,
        first: String,
        second: String,
    },
    /// Evaluate a tab-separated pair file
    Batch {
        /// Pair file (defaults to $QRC_PAIRS)
        #[arg(long)]
        pairs: Option<PathBuf>,
    },
    /// Run an interactive session; each stdin line is one decoded payload
    ///
    /// Lines starting with `:` are commands: `:next`, `:retry`,
    /// `:mode <mode>`, `:camera <id>`.
    Session {
        #[arg(long, default_value_t = NormalizationMode::Exact)]
        mode: NormalizationMode,
        /// Available camera as `ID` or `ID=LABEL`; repeatable
        #[arg(long = "camera")]
        cameras: Vec<String>,
        /// Wait for `:next` instead of resetting automatically
        #[arg(long)]
        manual: bool,
    },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    match cli.command {
        Command::Normalize { mode, text } => normalize_cmd(mode, &text, cli.json),
        Command::Compare {
            mode,
            first,
            second,
        } => compare_cmd(mode, &first, &second, cli.json),
        Command::Batch { pairs } => batch_cmd(pairs, cli.json),
        Command::Session {
            mode,
            cameras,
            manual,
        } => session_cmd(mode, &cameras, manual),
    }
}

fn normalize_cmd(mode: NormalizationMode, text: &str, json: bool) -> ExitCode {
    let value = normalize(text, mode);
    if json {
        println!(
            "{}",
            serde_json::json!({ "mode": mode, "input": text, "canonical": value })
        );
    } else {
        println!("{value}");
    }
    ExitCode::SUCCESS
}

fn compare_cmd(mode: NormalizationMode, first: &str, second: &str, json: bool) -> ExitCode {
    let outcome = compare(first, second, mode);
    let matched = outcome.verdict() == Some(true);
    if json {
        match serde_json::to_string(&outcome) {
            Ok(text) => println!("{text}"),
            Err(err) => {
                eprintln!("Failed to serialize outcome: {err}");
                return ExitCode::from(2);
            }
        }
    } else {
        println!("{}  •  Mode: {}", result_text(matched), mode.label());
    }
    if matched {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    }
}

fn batch_cmd(pairs: Option<PathBuf>, json: bool) -> ExitCode {
    let Some(path) = pairs.or_else(pairs_file_from_env) else {
        eprintln!("No pair file given (use --pairs or set QRC_PAIRS)");
        return ExitCode::from(2);
    };
    let cases = match load_pairs(&path) {
        Ok(cases) => cases,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::from(2);
        }
    };

    let reports = evaluate_pairs(&cases);
    let summary = summarize(&reports);

    if json {
        let doc = serde_json::json!({ "reports": reports, "summary": summary });
        println!("{doc}");
    } else {
        println!("Pair file: {} ({} cases)", path.display(), cases.len());
        for report in &reports {
            print_report(report);
        }
        println!(
            "\nMatched {}/{}; {} of {} labelled cases disagreed",
            summary.matched, summary.total, summary.disagreements, summary.labelled
        );
    }

    if summary.disagreements == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    }
}

fn print_report(report: &PairReport) {
    let flag = match report.agrees() {
        Some(false) => "  <-- unexpected",
        _ => "",
    };
    println!(
        "  line {:>3} [{}] {}{}",
        report.case.line,
        report.case.mode,
        result_text(report.matched),
        flag
    );
    println!("           {}", report.first_canonical);
    println!("           {}", report.second_canonical);
}

fn parse_camera(arg: &str) -> CameraSource {
    match arg.split_once('=') {
        Some((id, label)) => CameraSource::new(id, Some(label)),
        None => CameraSource::new(arg, None),
    }
}

fn session_cmd(mode: NormalizationMode, cameras: &[String], manual: bool) -> ExitCode {
    let cameras: Vec<CameraSource> = cameras.iter().map(|arg| parse_camera(arg)).collect();
    for (idx, camera) in cameras.iter().enumerate() {
        println!("camera {}: {}", camera.id, camera.display_label(idx));
    }

    let mut config = SessionConfig::from_env();
    if manual {
        config = config.manual_advance();
    }

    let restart_expected = config.auto_reset.is_some();
    let decoder = LineDecoder::new();
    let gate = decoder.gate();
    let mut runtime = Runtime::new(ScanSession::new(mode, config), decoder, ConsoleSink);
    let Some(events) = runtime.event_sender() else {
        eprintln!("Session runtime already running");
        return ExitCode::from(2);
    };

    if events.send(Event::Boot { cameras }).is_err() {
        return ExitCode::from(2);
    }
    std::thread::spawn(move || {
        let sent = feed_lines(io::stdin().lock(), &events, &gate, restart_expected);
        log::debug!("stdin closed after {sent} events");
    });

    runtime.run();
    ExitCode::SUCCESS
}

struct ConsoleSink;

impl PresentationSink for ConsoleSink {
    fn set_status(&mut self, text: &str) {
        println!("status: {text}");
    }

    fn show_result(&mut self, matched: bool) {
        println!("result: {}", result_text(matched));
    }

    fn clear_result(&mut self) {}

    fn flash(&mut self, matched: bool) {
        println!("*** {} ***", flash_text(matched));
    }

    fn hide_flash(&mut self) {}

    fn vibrate(&mut self, pattern: &[u64]) {
        log::debug!("vibrate {pattern:?}");
    }

    fn beep(&mut self) {
        print!("\x07");
    }
}
