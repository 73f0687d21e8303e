//! settle-engine CLI
//!
//! Work out who owes whom from a JSON ledger of shared expenses.
//!
//! # Usage
//!
//! ```bash
//! # Group-wide report: net balances and simplified transfers
//! settle-engine balances --input ledger.json
//!
//! # One person's view
//! settle-engine balances --input ledger.json --user alice --format json
//!
//! # Spending by category and month
//! settle-engine summary --input ledger.json --user alice
//!
//! # Generate a random ledger for testing
//! settle-engine generate --users 6 --expenses 40
//! ```
//!
//! Set `RUST_LOG=debug` to see what the engine is doing.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use settle_engine::analysis::spending::SpendingSummary;
use settle_engine::balance::engine::BalanceEngine;
use settle_engine::core::expense::{Expense, SplitRule};
use settle_engine::core::settlement::Settlement;
use settle_engine::core::user::UserId;
use settle_engine::ledger::source::InMemoryLedger;
use settle_engine::simulation::stress_test::{generate_random_ledger, LedgerConfig};
use std::collections::BTreeMap;
use std::fs;
use std::process;

fn print_usage() {
    eprintln!(
        r#"settle-engine — shared-expense balances and debt simplification

USAGE:
    settle-engine <COMMAND> [OPTIONS]

COMMANDS:
    balances    Compute net balances and the simplified transfer list
    summary     Show one user's spending by category and month
    generate    Generate a random ledger (for testing)
    help        Show this message

OPTIONS (balances, summary):
    --input <FILE>      Path to JSON ledger file
    --user <ID>         Project results for one user (required for summary)
    --format <FORMAT>   Output format: text (default) or json

OPTIONS (generate):
    --users <N>         Number of users (default: 5)
    --expenses <N>      Number of expenses (default: 20)
    --settlements <N>   Number of settlements (default: 5)
    --output <FILE>     Write to file instead of stdout

EXAMPLES:
    settle-engine balances --input ledger.json
    settle-engine balances --input ledger.json --user alice --format json
    settle-engine summary --input ledger.json --user alice
    settle-engine generate --users 8 --expenses 50 --output ledger.json"#
    );
}

/// JSON schema for an input ledger.
#[derive(serde::Deserialize, serde::Serialize)]
struct LedgerFile {
    #[serde(default)]
    expenses: Vec<ExpenseInput>,
    #[serde(default)]
    settlements: Vec<SettlementInput>,
}

#[derive(serde::Deserialize, serde::Serialize)]
struct ExpenseInput {
    description: String,
    amount: String,
    payer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    created_at: Option<DateTime<Utc>>,
    split: SplitInput,
}

#[derive(serde::Deserialize, serde::Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum SplitInput {
    Equal { participants: Vec<String> },
    Exact { shares: BTreeMap<String, String> },
    Percent { shares: BTreeMap<String, String> },
}

#[derive(serde::Deserialize, serde::Serialize)]
struct SettlementInput {
    from: String,
    to: String,
    amount: String,
}

#[derive(serde::Serialize)]
struct ReportOutput {
    gross_total: String,
    net_total: String,
    savings_percent: f64,
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    warning: Option<String>,
    balances: Vec<BalanceOutput>,
    transfers: Vec<TransferOutput>,
}

#[derive(serde::Serialize)]
struct BalanceOutput {
    user: String,
    net_balance: String,
    status: String,
}

#[derive(serde::Serialize)]
struct TransferOutput {
    from: String,
    to: String,
    amount: String,
}

#[derive(serde::Serialize)]
struct UserBalanceOutput {
    counterparty: String,
    amount: String,
    direction: String,
}

fn parse_amount(raw: &str) -> Decimal {
    raw.trim().parse().unwrap_or_else(|e| {
        eprintln!("Invalid amount '{}': {}", raw, e);
        process::exit(1);
    })
}

fn parse_shares(shares: &BTreeMap<String, String>) -> Vec<(UserId, Decimal)> {
    shares
        .iter()
        .map(|(user, amount)| (UserId::new(user.as_str()), parse_amount(amount)))
        .collect()
}

fn load_ledger(path: &str) -> InMemoryLedger {
    let content = fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading file '{}': {}", path, e);
        process::exit(1);
    });

    let file: LedgerFile = serde_json::from_str(&content).unwrap_or_else(|e| {
        eprintln!("Error parsing JSON: {}", e);
        eprintln!("Expected format:");
        eprintln!(r#"{{
  "expenses": [
    {{ "description": "Dinner", "amount": "90.00", "payer": "alice",
       "split": {{ "type": "equal", "participants": ["alice", "bob", "carol"] }} }}
  ],
  "settlements": [
    {{ "from": "bob", "to": "alice", "amount": "30.00" }}
  ]
}}"#);
        process::exit(1);
    });

    let mut ledger = InMemoryLedger::new();
    for input in file.expenses {
        let rule = match &input.split {
            SplitInput::Equal { participants } => SplitRule::Equal(
                participants
                    .iter()
                    .map(|p| UserId::new(p.as_str()))
                    .collect(),
            ),
            SplitInput::Exact { shares } => SplitRule::Exact(parse_shares(shares)),
            SplitInput::Percent { shares } => SplitRule::Percent(parse_shares(shares)),
        };

        let mut expense = Expense::new(
            input.description.as_str(),
            parse_amount(&input.amount),
            UserId::new(input.payer.as_str()),
            rule,
        )
        .unwrap_or_else(|e| {
            eprintln!("Invalid expense '{}': {}", input.description, e);
            process::exit(1);
        });
        if let Some(category) = input.category {
            expense = expense.with_category(category);
        }
        if let Some(group) = input.group {
            expense = expense.with_group(group);
        }
        if let Some(created_at) = input.created_at {
            expense = expense.with_created_at(created_at);
        }
        ledger.record_expense(expense);
    }

    for input in file.settlements {
        let settlement = Settlement::new(
            UserId::new(input.from.as_str()),
            UserId::new(input.to.as_str()),
            parse_amount(&input.amount),
        )
        .unwrap_or_else(|e| {
            eprintln!("Invalid settlement: {}", e);
            process::exit(1);
        });
        ledger.record_settlement(settlement);
    }
    ledger
}

struct CommonArgs {
    input: String,
    user: Option<UserId>,
    format: String,
}

fn parse_common_args(args: &[String]) -> CommonArgs {
    let mut input_path = None;
    let mut user = None;
    let mut format = "text".to_string();
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--input" => {
                i += 1;
                input_path = Some(args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--input requires a file path");
                    process::exit(1);
                }));
            }
            "--user" => {
                i += 1;
                user = Some(UserId::new(args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--user requires a user id");
                    process::exit(1);
                })));
            }
            "--format" => {
                i += 1;
                format = args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--format requires 'text' or 'json'");
                    process::exit(1);
                });
            }
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                process::exit(1);
            }
        }
        i += 1;
    }

    let input = input_path.unwrap_or_else(|| {
        eprintln!("Error: --input <FILE> is required");
        process::exit(1);
    });

    CommonArgs {
        input,
        user,
        format,
    }
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error serializing output: {}", e);
            process::exit(1);
        }
    }
}

fn cmd_balances(args: &[String]) {
    let args = parse_common_args(args);
    let ledger = load_ledger(&args.input);
    let report = BalanceEngine::report(&ledger).unwrap_or_else(|e| {
        eprintln!("Error computing balances: {}", e);
        process::exit(1);
    });

    match (&args.user, args.format.as_str()) {
        (Some(user), "json") => {
            let balances: Vec<UserBalanceOutput> = report
                .project_for(user)
                .visible()
                .map(|(other, amount)| UserBalanceOutput {
                    counterparty: other.to_string(),
                    amount: amount.abs().round_dp(2).to_string(),
                    direction: if amount > Decimal::ZERO {
                        "OWES_YOU".to_string()
                    } else {
                        "YOU_OWE".to_string()
                    },
                })
                .collect();
            print_json(&balances);
        }
        (Some(user), _) => {
            println!("{}", report.project_for(user));
        }
        (None, "json") => {
            let output = ReportOutput {
                gross_total: report.gross_total().round_dp(2).to_string(),
                net_total: report.net_total().round_dp(2).to_string(),
                savings_percent: report.savings_percent(),
                valid: report.is_valid(),
                warning: report.anomaly().map(|a| a.to_string()),
                balances: report
                    .net_balances()
                    .iter()
                    .map(|(user, amount)| BalanceOutput {
                        user: user.to_string(),
                        net_balance: amount.round_dp(2).to_string(),
                        status: if amount > Decimal::ZERO {
                            "CREDITOR".to_string()
                        } else {
                            "DEBTOR".to_string()
                        },
                    })
                    .collect(),
                transfers: report
                    .transfers()
                    .iter()
                    .map(|t| TransferOutput {
                        from: t.from().to_string(),
                        to: t.to().to_string(),
                        amount: t.amount().round_dp(2).to_string(),
                    })
                    .collect(),
            };
            print_json(&output);
        }
        (None, _) => {
            println!("{}", report);
        }
    }
}

fn cmd_summary(args: &[String]) {
    let args = parse_common_args(args);
    let user = args.user.unwrap_or_else(|| {
        eprintln!("Error: --user <ID> is required for summary");
        process::exit(1);
    });
    let ledger = load_ledger(&args.input);
    let summary = SpendingSummary::for_user(ledger.expenses(), &user, Utc::now());

    if args.format == "json" {
        print_json(&summary);
    } else {
        println!("{}", summary);
    }
}

fn cmd_generate(args: &[String]) {
    let mut config = LedgerConfig::default();
    let mut output_path: Option<String> = None;
    let mut i = 0;
    while i < args.len() {
        let parse_count = |i: usize, flag: &str| -> usize {
            args.get(i)
                .and_then(|s| s.parse().ok())
                .unwrap_or_else(|| {
                    eprintln!("{} requires a number", flag);
                    process::exit(1);
                })
        };
        match args[i].as_str() {
            "--users" => {
                i += 1;
                config.user_count = parse_count(i, "--users");
            }
            "--expenses" => {
                i += 1;
                config.expense_count = parse_count(i, "--expenses");
            }
            "--settlements" => {
                i += 1;
                config.settlement_count = parse_count(i, "--settlements");
            }
            "--output" => {
                i += 1;
                output_path = Some(args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--output requires a file path");
                    process::exit(1);
                }));
            }
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                process::exit(1);
            }
        }
        i += 1;
    }

    let ledger = generate_random_ledger(&config);

    let output = LedgerFile {
        expenses: ledger
            .expenses()
            .iter()
            .map(|e| {
                let mut shares: BTreeMap<String, String> = BTreeMap::new();
                for split in e.splits() {
                    shares.insert(split.debtor().to_string(), split.share().to_string());
                }
                ExpenseInput {
                    description: e.description().to_string(),
                    amount: e.amount().to_string(),
                    payer: e.payer().to_string(),
                    category: Some(e.category().to_string()),
                    group: e.group().map(str::to_string),
                    created_at: Some(e.created_at()),
                    split: SplitInput::Exact { shares },
                }
            })
            .collect(),
        settlements: ledger
            .settlements()
            .iter()
            .map(|s| SettlementInput {
                from: s.from().to_string(),
                to: s.to().to_string(),
                amount: s.amount().to_string(),
            })
            .collect(),
    };

    let json = serde_json::to_string_pretty(&output).unwrap_or_else(|e| {
        eprintln!("Error serializing ledger: {}", e);
        process::exit(1);
    });

    if let Some(path) = output_path {
        fs::write(&path, &json).unwrap_or_else(|e| {
            eprintln!("Error writing to '{}': {}", path, e);
            process::exit(1);
        });
        eprintln!(
            "Generated {} expenses and {} settlements across {} users → {}",
            ledger.expenses().len(),
            ledger.settlements().len(),
            config.user_count,
            path
        );
    } else {
        println!("{}", json);
    }
}

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let command = args[1].as_str();
    let rest = &args[2..];

    match command {
        "balances" => cmd_balances(rest),
        "summary" => cmd_summary(rest),
        "generate" => cmd_generate(rest),
        "help" | "--help" | "-h" => print_usage(),
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            process::exit(1);
        }
    }
}
