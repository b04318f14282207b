use clap::Parser;
use slot_table::HashTable;
use slot_table::Pair;
use slot_table::TableError;
use slot_table::capacity;

#[derive(Parser, Debug)]
struct Args {
    #[arg(short = 'c', long = "target_capacity", default_value_t = 1000)]
    target_capacity: usize,

    /// Keep adding records past the load limit until the table has grown this
    /// many times.
    #[arg(short = 'g', long = "growths", default_value_t = 0)]
    growths: u32,

    /// Remove every n-th record with a cursor walk before printing stats.
    #[arg(short = 'r', long = "remove_every", default_value_t = 0)]
    remove_every: usize,
}

fn main() -> Result<(), TableError> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let args = Args::parse();

    println!(
        "Creating HashTable with target capacity: {}",
        args.target_capacity
    );

    let mut table: HashTable<Pair<u64, u64>> =
        HashTable::with_capacity(args.target_capacity.max(capacity::MIN_SLOTS))?;

    println!("Actual capacity: {}", table.capacity());
    println!("Filling table with u64 keys...");

    let mut growths = 0;
    let mut key = 0u64;
    loop {
        let before = table.capacity();
        if capacity::exceeds_max_load(table.len() + 1, before) && growths == args.growths {
            break;
        }
        table.add(key)?.value = key * 2;
        key += 1;
        if table.capacity() != before {
            growths += 1;
        }
    }

    println!("Inserted {} records into table", table.len());
    println!("Final load factor: {:.2}%", table.load_factor() * 100.0);

    if args.remove_every > 0 {
        let mut removed = 0;
        let mut visited = 0;
        let mut cursor = table.first();
        while let Some(handle) = cursor {
            visited += 1;
            cursor = if visited % args.remove_every == 0 {
                removed += 1;
                table.remove_and_next(handle)
            } else {
                table.next(handle)
            };
        }
        println!(
            "Removed {} of {} visited records, {} remain",
            removed,
            visited,
            table.len()
        );
    }

    table.probe_histogram().print();
    table.debug_stats().print();

    Ok(())
}
