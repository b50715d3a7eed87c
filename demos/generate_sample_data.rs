use std::env;
use std::fs::{create_dir_all, File};
use std::io::{self, stdout, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{Duration, NaiveDate, TimeZone, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;

const PROBABILITY_FRAUD: f64 = 0.08;
const PROBABILITY_MISSING_ACTIVITY: f64 = 0.03;
const PROBABILITY_MISSING_AMOUNT: f64 = 0.01;
const PROBABILITY_UNLISTED_CURRENCY: f64 = 0.005;

const HEADER: &str = "transaction_id,customer_id,card_number,timestamp,vendor_category,vendor_type,vendor,amount,currency,country,city,city_size,card_type,is_card_present,device,channel,device_fingerprint,ip_address,is_outside_home_country,is_high_risk_vendor,is_weekend,last_hour_activity,is_fraud";

// (currency, country, USD rate at the start of the period)
const MARKETS: [(&str, &str, f64); 11] = [
    ("USD", "USA", 1.0),
    ("EUR", "Germany", 0.9),
    ("GBP", "UK", 0.75),
    ("JPY", "Japan", 142.5),
    ("AUD", "Australia", 1.44),
    ("BRL", "Brazil", 5.43),
    ("CAD", "Canada", 1.35),
    ("MXN", "Mexico", 19.7),
    ("NGN", "Nigeria", 1668.7),
    ("RUB", "Russia", 94.1),
    ("SGD", "Singapore", 1.28),
];

const VENDORS: [(&str, &str, &str); 8] = [
    ("Retail", "online", "Amazon"),
    ("Grocery", "physical", "Whole Foods"),
    ("Restaurant", "fast_food", "Taco Bell"),
    ("Travel", "airline", "Delta"),
    ("Entertainment", "gaming", "Steam"),
    ("Gas", "major", "Exxon"),
    ("Healthcare", "medical", "Medical Center"),
    ("Education", "online", "Coursera"),
];

const DEVICES: [(&str, &str); 5] = [
    ("Chrome", "web"),
    ("Firefox", "web"),
    ("iOS App", "mobile"),
    ("Android App", "mobile"),
    ("NFC Payment", "pos"),
];

const CARD_TYPES: [&str; 4] = ["Basic Debit", "Premium Debit", "Basic Credit", "Platinum Credit"];

struct GeneratorConfig {
    num_records: usize,
    num_customers: usize,
    num_days: i64,
    output_dir: PathBuf,
}

impl GeneratorConfig {
    fn from_args() -> Self {
        let args: Vec<String> = env::args().collect();
        let num_records = args.get(1).and_then(|s| s.parse().ok()).unwrap_or(100_000);
        let num_customers = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(5_000);
        let num_days = args.get(3).and_then(|s| s.parse().ok()).unwrap_or(30);

        Self {
            num_records,
            num_customers,
            num_days,
            output_dir: PathBuf::from("data"),
        }
    }
}

struct Customer {
    id: String,
    card_number: u64,
    card_type: &'static str,
    market: usize,
    fingerprint: String,
}

fn main() -> io::Result<()> {
    let config = GeneratorConfig::from_args();
    let start = NaiveDate::from_ymd_opt(2024, 9, 30).unwrap();

    println!(
        "Generating {} transactions for {} customers over {} days in {}...",
        config.num_records,
        config.num_customers,
        config.num_days,
        config.output_dir.display()
    );

    create_dir_all(&config.output_dir)?;

    let mut rng = rand::thread_rng();

    generate_fx(&config.output_dir.join("historical_currency_exchange.csv"), &mut rng, start, config.num_days)?;

    let customers: Vec<Customer> = (0..config.num_customers)
        .map(|index| Customer {
            id: format!("CUST_{:05}", 10_000 + index),
            card_number: rng.gen_range(4_000_000_000_000_000..5_000_000_000_000_000),
            card_type: *CARD_TYPES.choose(&mut rng).unwrap(),
            market: rng.gen_range(0..MARKETS.len()),
            fingerprint: format!("{:032x}", rng.r#gen::<u128>()),
        })
        .collect();

    let path = config.output_dir.join("transaction_fraud_data.csv");
    let mut writer = BufWriter::new(File::create(&path)?);

    writeln!(writer, "{}", HEADER)?;

    let period_seconds = config.num_days * 86_400;

    for index in 0..config.num_records {
        let customer = customers.choose(&mut rng).unwrap();
        let offset = Duration::seconds(rng.gen_range(0..period_seconds));
        let timestamp = Utc.from_utc_datetime(&start.and_hms_opt(0, 0, 0).unwrap()) + offset;

        generate_transaction(&mut writer, &mut rng, index, customer, timestamp)?;

        if index % 10_000 == 0 {
            print!(".");
            stdout().flush()?;
        }
    }

    println!("\nGeneration complete.");

    Ok(())
}

fn generate_fx<R: Rng>(path: &Path, rng: &mut R, start: NaiveDate, num_days: i64) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    let mut codes: Vec<&str> = MARKETS.iter().map(|(code, _, _)| *code).collect();
    codes.sort();

    writeln!(writer, "date,{}", codes.join(","))?;

    let mut rates: Vec<f64> = codes
        .iter()
        .map(|code| MARKETS.iter().find(|(c, _, _)| c == code).map_or(1.0, |(_, _, rate)| *rate))
        .collect();

    for day in 0..num_days {
        let date = start + Duration::days(day);
        let row: Vec<String> = codes
            .iter()
            .zip(rates.iter())
            .map(|(code, rate)| if *code == "USD" { "1".to_string() } else { format!("{:.6}", rate) })
            .collect();

        writeln!(writer, "{},{}", date.format("%Y-%m-%d"), row.join(","))?;

        for rate in rates.iter_mut() {
            *rate *= 1.0 + rng.gen_range(-0.005..0.005);
        }
    }

    Ok(())
}

fn generate_transaction<W: Write, R: Rng>(
    writer: &mut W,
    rng: &mut R,
    index: usize,
    customer: &Customer,
    timestamp: chrono::DateTime<Utc>,
) -> io::Result<()> {
    let is_fraud = rng.gen_bool(PROBABILITY_FRAUD);
    let (vendor_category, vendor_type, vendor) = VENDORS.choose(rng).unwrap();
    let (device, channel) = DEVICES.choose(rng).unwrap();
    let is_outside_home_country = rng.gen_bool(if is_fraud { 0.6 } else { 0.1 });

    let market = if is_outside_home_country { rng.gen_range(0..MARKETS.len()) } else { customer.market };
    let (currency, country, rate) = MARKETS[market];
    let currency = if rng.gen_bool(PROBABILITY_UNLISTED_CURRENCY) { "CHF" } else { currency };

    let amount = if rng.gen_bool(PROBABILITY_MISSING_AMOUNT) {
        String::new()
    } else {
        generate_amount(rng, rate, is_fraud).to_string()
    };

    let is_card_present = *channel == "pos" && rng.gen_bool(0.9);
    let is_high_risk_vendor = rng.gen_bool(if is_fraud { 0.4 } else { 0.05 });
    let is_weekend = matches!(timestamp.format("%u").to_string().as_str(), "6" | "7");

    let activity = if rng.gen_bool(PROBABILITY_MISSING_ACTIVITY) {
        String::new()
    } else {
        generate_activity(rng, is_fraud)
    };

    writeln!(
        writer,
        "TX_{:08x},{},{},{},{},{},{},{},{},{},Unknown City,medium,{},{},{},{},{},{}.{}.{}.{},{},{},{},{},{}",
        index,
        customer.id,
        customer.card_number,
        timestamp.format("%Y-%m-%d %H:%M:%S%.6f%:z"),
        vendor_category,
        vendor_type,
        vendor,
        amount,
        currency,
        country,
        customer.card_type,
        python_bool(is_card_present),
        device,
        channel,
        customer.fingerprint,
        rng.gen_range(1..=223),
        rng.gen_range(0..=255),
        rng.gen_range(0..=255),
        rng.gen_range(1..=254),
        python_bool(is_outside_home_country),
        python_bool(is_high_risk_vendor),
        python_bool(is_weekend),
        activity,
        u8::from(is_fraud)
    )?;

    Ok(())
}

fn generate_amount<R: Rng>(rng: &mut R, rate: f64, is_fraud: bool) -> Decimal {
    let usd = if is_fraud {
        rng.gen_range(200.0..5000.0)
    } else {
        rng.gen_range(1.0..800.0)
    };

    Decimal::from_f64(usd * rate).unwrap_or_default().round_dp(2)
}

fn generate_activity<R: Rng>(rng: &mut R, is_fraud: bool) -> String {
    let num_transactions: u32 = if is_fraud { rng.gen_range(50..1500) } else { rng.gen_range(0..60) };
    let max_single_amount = rng.gen_range(10.0..5000.0_f64);
    let total_amount = max_single_amount * f64::from(num_transactions.max(1)) * rng.gen_range(0.2..1.0);

    format!(
        "\"{{\"\"num_transactions\"\": {}, \"\"total_amount\"\": {:.2}, \"\"unique_merchants\"\": {}, \"\"unique_countries\"\": {}, \"\"max_single_amount\"\": {:.2}}}\"",
        num_transactions,
        total_amount,
        rng.gen_range(1..=num_transactions.clamp(1, 120)),
        rng.gen_range(1..=12),
        max_single_amount
    )
}

fn python_bool(value: bool) -> &'static str {
    if value { "True" } else { "False" }
}
