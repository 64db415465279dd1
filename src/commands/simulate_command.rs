use crate::commands::TransactionBuilder;
use crate::core::{Address, Amount, Miner, TransactionPool, UtxoSet};
use clap::{App, Arg, ArgMatches};
use serde::Serialize;
use std::error::Error;
use std::io::{self, BufRead, Write};

struct SimulateCliOptions {
    max_pool_size: usize,
    block_size: usize,
}

impl SimulateCliOptions {
    pub fn parse(matches: &ArgMatches) -> Result<Self, Box<dyn Error>> {
        Ok(Self {
            max_pool_size: matches.value_of_t::<usize>("max-pool-size")?,
            block_size: matches.value_of_t::<usize>("block-size")?,
        })
    }
}

pub fn simulate_command() -> App<'static> {
    App::new("simulate")
        .version("0.1")
        .about("Interactive single-node ledger simulator over the genesis outputs.")
        .arg(
            Arg::new("max-pool-size")
                .long("max-pool-size")
                .value_name("COUNT")
                .help("Maximum number of transactions held in the pending pool.")
                .takes_value(true)
                .required(false)
                .default_value("50"),
        )
        .arg(
            Arg::new("block-size")
                .long("block-size")
                .value_name("COUNT")
                .help("Maximum number of transactions mined into one block.")
                .takes_value(true)
                .required(false)
                .default_value("5"),
        )
}

pub fn run_simulate_command(matches: &ArgMatches) -> Result<(), Box<dyn Error>> {
    let options = SimulateCliOptions::parse(matches)?;
    let mut utxos = UtxoSet::with_genesis();
    let mut pool = TransactionPool::new(options.max_pool_size);

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        println!();
        println!("=== TallyCoin ledger simulator ===");
        println!("1. Create transaction");
        println!("2. Show unspent outputs");
        println!("3. Show pending pool");
        println!("4. Mine block");
        println!("5. Exit");

        let choice = match prompt(&mut lines, "Enter choice: ")? {
            None => break,
            Some(choice) => choice,
        };
        match choice.as_str() {
            "1" => create_transaction(&mut lines, &mut pool, &utxos)?,
            "2" => show_unspent_outputs(&utxos)?,
            "3" => show_pending_pool(&pool)?,
            "4" => mine_block(&mut lines, &mut pool, &mut utxos, options.block_size)?,
            "5" => break,
            _ => println!("Invalid choice"),
        }
    }
    Ok(())
}

fn prompt(
    lines: &mut impl Iterator<Item = io::Result<String>>,
    label: &str,
) -> Result<Option<String>, Box<dyn Error>> {
    print!("{}", label);
    io::stdout().flush()?;
    match lines.next() {
        None => Ok(None),
        Some(line) => Ok(Some(line?.trim().to_string())),
    }
}

fn prompt_amount(
    lines: &mut impl Iterator<Item = io::Result<String>>,
    label: &str,
) -> Result<Option<Amount>, Box<dyn Error>> {
    match prompt(lines, label)? {
        None => Ok(None),
        Some(text) => match text.parse::<Amount>() {
            Ok(amount) => Ok(Some(amount)),
            Err(e) => {
                println!("Invalid amount '{}': {}", text, e);
                Ok(None)
            }
        },
    }
}

fn create_transaction(
    lines: &mut impl Iterator<Item = io::Result<String>>,
    pool: &mut TransactionPool,
    utxos: &UtxoSet,
) -> Result<(), Box<dyn Error>> {
    let sender = match prompt(lines, "Sender: ")? {
        None => return Ok(()),
        Some(name) => Address::new(name),
    };
    let recipient = match prompt(lines, "Recipient: ")? {
        None => return Ok(()),
        Some(name) => Address::new(name),
    };
    let amount = match prompt_amount(lines, "Amount: ")? {
        None => return Ok(()),
        Some(amount) => amount,
    };
    let fee_rate = match prompt_amount(lines, "Fee rate per byte: ")? {
        None => return Ok(()),
        Some(fee_rate) => fee_rate,
    };

    match TransactionBuilder::build(&sender, &recipient, amount, fee_rate, utxos) {
        Err(reason) => println!("Could not build transaction: {}", reason),
        Ok(transaction) => {
            let id = transaction.id().clone();
            match pool.add_transaction(transaction, utxos) {
                Ok(()) => println!("Transaction {} accepted into the pool", id),
                Err(reason) => println!("Transaction rejected: {}", reason),
            }
        }
    }
    Ok(())
}

#[derive(Serialize)]
struct UnspentOutputView {
    outpoint: String,
    owner: String,
    amount: Amount,
}

fn show_unspent_outputs(utxos: &UtxoSet) -> Result<(), Box<dyn Error>> {
    let mut entries = utxos
        .iter()
        .map(|(outpoint, utxo)| UnspentOutputView {
            outpoint: outpoint.to_string(),
            owner: utxo.owner().to_string(),
            amount: utxo.amount(),
        })
        .collect::<Vec<UnspentOutputView>>();
    entries.sort_by(|a, b| a.outpoint.cmp(&b.outpoint));

    println!("{}", serde_json::to_string_pretty(&entries)?);
    println!("{} outputs, {} total", utxos.len(), utxos.total_amount());
    Ok(())
}

fn show_pending_pool(pool: &TransactionPool) -> Result<(), Box<dyn Error>> {
    println!("{}", serde_json::to_string_pretty(pool.transactions())?);
    println!("{} pending transactions", pool.len());
    Ok(())
}

fn mine_block(
    lines: &mut impl Iterator<Item = io::Result<String>>,
    pool: &mut TransactionPool,
    utxos: &mut UtxoSet,
    block_size: usize,
) -> Result<(), Box<dyn Error>> {
    let miner = match prompt(lines, "Miner: ")? {
        None => return Ok(()),
        Some(name) => Address::new(name),
    };
    let summary = Miner::mine_block(&miner, pool, utxos, block_size);
    println!("{}", summary);
    if !summary.total_fees.is_zero() {
        println!("{} now holds {}", miner, utxos.balance_of(&miner));
    }
    Ok(())
}
