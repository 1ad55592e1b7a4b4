//! haemong CLI - interpret a dream from the terminal
//!
//! Usage:
//!   haemong "<dream text>" [--proxy <url>] [--model <model>] [--no-ads]
//!
//! Example:
//!   GEMINI_API_KEY=... haemong "하늘을 나는 꿈을 꿨어요"
//!   haemong "용이 승천하는 꿈" --proxy http://localhost:8080

use anyhow::{bail, Result};
use colored::Colorize;
use haemong::ads::{AdGate, NoAdGate, TimerAdGate};
use haemong::lotto::{ball_color, BallColor, NumberSet};
use haemong::orchestrator::Orchestrator;
use haemong::provider::{GenerateProvider, GeminiProvider, ProxyProvider};
use haemong::session::{transition, Event, UiState};
use haemong::HaemongConfig;
use std::io::Read;
use std::sync::Arc;

fn print_usage() {
    eprintln!(
        r#"
{} - AI dream interpretation with lucky numbers

{}
    haemong <DREAM TEXT | -> [OPTIONS]

{}
    <DREAM TEXT>   The dream to interpret (at least 10 characters);
                   pass '-' to read it from stdin

{}
    --proxy <URL>      Talk to a running haemong server instead of the
                       Gemini API directly (no local key needed)
    -m, --model <M>    Gemini model (default: gemini-2.0-flash)
    --no-ads           Skip the simulated advertisement waits
    -h, --help         Print this help message

{}
    GEMINI_API_KEY     API key for direct (non-proxy) calls
"#,
        "haemong".bold(),
        "USAGE:".bold(),
        "ARGS:".bold(),
        "OPTIONS:".bold(),
        "ENVIRONMENT:".bold(),
    );
}

struct CliArgs {
    dream: String,
    proxy_url: Option<String>,
    model: String,
    no_ads: bool,
}

fn parse_args() -> Result<CliArgs> {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 || args.iter().any(|a| a == "--help" || a == "-h") {
        print_usage();
        std::process::exit(if args.iter().any(|a| a == "--help" || a == "-h") {
            0
        } else {
            1
        });
    }

    let mut dream = args[1].clone();
    if dream == "-" {
        dream.clear();
        std::io::stdin().read_to_string(&mut dream)?;
    }

    let mut proxy_url = None;
    let mut model = HaemongConfig::default().model;
    let mut no_ads = false;

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--proxy" => {
                i += 1;
                if i < args.len() {
                    proxy_url = Some(args[i].clone());
                }
            }
            "--model" | "-m" => {
                i += 1;
                if i < args.len() {
                    model = args[i].clone();
                }
            }
            "--no-ads" => {
                no_ads = true;
            }
            other => {
                bail!("Unknown option: {}", other);
            }
        }
        i += 1;
    }

    Ok(CliArgs {
        dream,
        proxy_url,
        model,
        no_ads,
    })
}

fn ball_colored(n: u8) -> String {
    let text = format!("({:2})", n);
    match ball_color(n) {
        BallColor::Yellow => text.yellow().to_string(),
        BallColor::Blue => text.blue().to_string(),
        BallColor::Red => text.red().to_string(),
        BallColor::Gray => text.dimmed().to_string(),
        BallColor::Green => text.green().to_string(),
    }
}

fn print_sets(sets: &[NumberSet], offset: usize) {
    for (i, set) in sets.iter().enumerate() {
        let balls: Vec<String> = set.numbers().iter().map(|&n| ball_colored(n)).collect();
        println!("  {}세트  {}", offset + i + 1, balls.join(" "));
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = parse_args()?;

    let config = HaemongConfig {
        model: args.model.clone(),
        ..HaemongConfig::default()
    };

    let provider: Arc<dyn GenerateProvider> = match &args.proxy_url {
        Some(url) => Arc::new(ProxyProvider::new(url.clone())),
        None => {
            let api_key = std::env::var("GEMINI_API_KEY").unwrap_or_default();
            if api_key.is_empty() {
                eprintln!(
                    "{} GEMINI_API_KEY is not set; the upstream call will fail. Use --proxy to go through a running server.",
                    "warning:".yellow().bold()
                );
            }
            Arc::new(GeminiProvider::with_base_url(
                &config.base_url,
                api_key,
                &config.model,
            ))
        }
    };

    let ad_gate: Arc<dyn AdGate> = if args.no_ads {
        Arc::new(NoAdGate)
    } else {
        Arc::new(TimerAdGate::from_secs(config.ad_wait_secs))
    };

    let ad_wait_secs = config.ad_wait_secs;
    let orchestrator = Orchestrator::new(config, provider, ad_gate);

    let mut state = UiState::Idle;
    state = transition(state, Event::Submit);
    println!("{}", "꿈을 해석하는 중입니다...".dimmed());

    let interpretation = match orchestrator.interpret(&args.dream).await {
        Ok(interpretation) => {
            state = transition(state, Event::InterpretationReady);
            interpretation
        }
        Err(e) => {
            let state = transition(state, Event::InterpretationFailed);
            debug_assert_eq!(state, UiState::Failed);
            eprintln!("{} {}", "해몽 실패:".red().bold(), e);
            std::process::exit(1);
        }
    };

    println!();
    println!("{}", "[동양의 해몽]".bold().cyan());
    println!("{}\n", interpretation.eastern);
    println!("{}", "[서양의 해몽]".bold().cyan());
    println!("{}\n", interpretation.western);

    println!("{}", "🍀 행운의 로또 번호".bold().yellow());

    state = transition(state, Event::RevealFirst);
    if !args.no_ads {
        println!("{}", format!("광고 시청 중... ({}초)", ad_wait_secs).dimmed());
    }
    let first = orchestrator.reveal_first(&interpretation).await;
    state = transition(state, Event::FirstAdFinished);
    print_sets(first, 0);

    state = transition(state, Event::RevealSecond);
    if !args.no_ads {
        println!("{}", format!("광고 시청 중... ({}초)", ad_wait_secs).dimmed());
    }
    let second = orchestrator.reveal_second(&interpretation).await;
    state = transition(state, Event::SecondAdFinished);
    print_sets(second, first.len());

    debug_assert_eq!(state, UiState::SecondRevealed);
    Ok(())
}
