//! A weekend trip among four friends.
//!
//! Records a few expenses with different split rules and a settlement,
//! then shows the simplified transfers and each person's view.

use settle_engine::prelude::*;
use rust_decimal_macros::dec;

fn main() {
    println!("╔═══════════════════════════════════════╗");
    println!("║  settle-engine: Weekend Trip Example  ║");
    println!("╚═══════════════════════════════════════╝\n");

    let alice = UserId::new("alice");
    let bob = UserId::new("bob");
    let carol = UserId::new("carol");
    let dave = UserId::new("dave");
    let everyone = vec![alice.clone(), bob.clone(), carol.clone(), dave.clone()];

    let mut ledger = InMemoryLedger::new();

    println!("Expenses:");
    println!("  alice paid $400 for the cabin, split equally");
    println!("  bob paid $100 for groceries, exact shares");
    println!("  carol paid $200 for the boat, by percentage");
    println!("  dave paid alice back $50\n");

    ledger.record_expense(
        Expense::new("Cabin", dec!(400), alice.clone(), SplitRule::Equal(everyone.clone()))
            .expect("valid cabin expense")
            .with_category("Lodging"),
    );
    ledger.record_expense(
        Expense::new(
            "Groceries",
            dec!(100),
            bob.clone(),
            SplitRule::Exact(vec![
                (alice.clone(), dec!(20)),
                (bob.clone(), dec!(30)),
                (carol.clone(), dec!(25)),
                (dave.clone(), dec!(25)),
            ]),
        )
        .expect("valid grocery expense")
        .with_category("Food"),
    );
    ledger.record_expense(
        Expense::new(
            "Boat rental",
            dec!(200),
            carol.clone(),
            SplitRule::Percent(vec![
                (alice.clone(), dec!(25)),
                (bob.clone(), dec!(25)),
                (carol.clone(), dec!(10)),
                (dave.clone(), dec!(40)),
            ]),
        )
        .expect("valid boat expense")
        .with_category("Entertainment"),
    );
    ledger.record_settlement(
        Settlement::new(dave.clone(), alice.clone(), dec!(50)).expect("valid settlement"),
    );

    let report = BalanceEngine::report(&ledger).expect("in-memory ledger is always readable");
    println!("{}", report);

    println!("━━━ Per-person view ━━━\n");
    for person in &everyone {
        println!("{}", report.project_for(person));
    }
}
