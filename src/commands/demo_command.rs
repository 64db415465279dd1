use crate::commands::TransactionBuilder;
use crate::core::{Address, Amount, Miner, TransactionPool, UtxoSet};
use clap::{App, ArgMatches};
use std::error::Error;

pub fn demo_command() -> App<'static> {
    App::new("demo")
        .version("0.1")
        .about("Scripted end-to-end run: two payments, one conflict, one mined block.")
}

pub fn run_demo_command(_matches: &ArgMatches) -> Result<(), Box<dyn Error>> {
    let mut utxos = UtxoSet::with_genesis();
    let mut pool = TransactionPool::default();

    let alice = Address::from("Alice");
    let bob = Address::from("Bob");
    let charlie = Address::from("Charlie");
    let miner = Address::from("Miner");

    println!("Genesis balances:");
    for owner in vec![&alice, &bob, &charlie] {
        println!("  {}: {}", owner, utxos.balance_of(owner));
    }

    let fee_rate = Amount::new(5, 5);
    submit_payment(&alice, &bob, Amount::from(10), fee_rate, &mut pool, &utxos)?;
    submit_payment(&bob, &charlie, Amount::from(5), fee_rate, &mut pool, &utxos)?;

    // Alice's only unspent output is already reserved by her first payment,
    // so a second spend of it must bounce off the pool.
    match TransactionBuilder::build(&alice, &charlie, Amount::from(5), fee_rate, &utxos) {
        Err(reason) => println!("Could not build conflicting payment: {}", reason),
        Ok(conflicting) => match pool.add_transaction(conflicting, &utxos) {
            Ok(()) => println!("Conflicting payment was unexpectedly admitted"),
            Err(reason) => println!("Conflicting payment rejected: {}", reason),
        },
    }

    println!();
    let summary = Miner::mine_block(&miner, &mut pool, &mut utxos, 5);
    println!("{}", summary);

    println!();
    println!("Balances after mining:");
    for owner in vec![&alice, &bob, &charlie, &miner] {
        println!("  {}: {}", owner, utxos.balance_of(owner));
    }
    println!("Total supply: {}", utxos.total_amount());
    Ok(())
}

fn submit_payment(
    sender: &Address,
    recipient: &Address,
    amount: Amount,
    fee_rate: Amount,
    pool: &mut TransactionPool,
    utxos: &UtxoSet,
) -> Result<(), Box<dyn Error>> {
    let transaction = TransactionBuilder::build(sender, recipient, amount, fee_rate, utxos)?;
    let id = transaction.id().clone();
    pool.add_transaction(transaction, utxos)?;
    if let Some(admitted) = pool.transactions().last() {
        println!(
            "Submitted {} -> {} for {} (fee {}), transaction {}",
            sender,
            recipient,
            amount,
            admitted.fee(),
            id
        );
    }
    Ok(())
}
