use clap::{App, Arg, ArgMatches};
use maxsat_approx::compare::benchmark;
use maxsat_approx::formula::weighted::{parse, parse_file};
use maxsat_approx::*;
use std::str::FromStr;

fn main() {
    env_logger::init();

    let matches = App::new("maxsat")
        .about("Approximates weighted MAX-SAT and compares against the exact optimum")
        .arg(Arg::with_name("INPUT").help("input file (weighted clauses), stdin if absent").index(1))
        .arg(
            Arg::with_name("no-brute-force")
                .long("no-brute-force")
                .help("skip the exact baseline"),
        )
        .arg(
            Arg::with_name("brute-force-max")
                .long("brute-force-max")
                .value_name("N")
                .takes_value(true)
                .help("largest variable count to enumerate exactly (at most 63)"),
        )
        .arg(
            Arg::with_name("samples")
                .long("samples")
                .value_name("N")
                .takes_value(true)
                .help("also report the best of N sampled LP roundings"),
        )
        .arg(
            Arg::with_name("seed")
                .long("seed")
                .value_name("S")
                .takes_value(true)
                .help("seed for sampled rounding"),
        )
        .arg(
            Arg::with_name("epsilon")
                .long("epsilon")
                .value_name("E")
                .takes_value(true)
                .help("simplex pivot tolerance"),
        )
        .get_matches();

    let config = match config_from(&matches) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("argument error: {}", e);
            std::process::exit(2);
        }
    };

    let f = if let Some(path) = matches.value_of("INPUT") {
        parse_file(path)
    } else {
        parse(std::io::stdin())
    };

    match f {
        Ok(f) => {
            let c = Comparison::run(&f, &config);
            report(&c);
            if c.timings.below_resolution() {
                report_benchmark(&f, &config);
            }
        }
        Err(e) => {
            eprintln!("parse error: {}", e);
            std::process::exit(1);
        }
    }
}

fn config_from(matches: &ArgMatches) -> Result<Config, String> {
    let mut config = Config::default();
    if let Some(n) = value_of(matches, "brute-force-max")? {
        config.brute_force_max_variables = n;
    }
    if matches.is_present("no-brute-force") {
        config.brute_force_max_variables = 0;
    }
    if let Some(n) = value_of(matches, "samples")? {
        config.rounding_samples = n;
    }
    if let Some(s) = value_of(matches, "seed")? {
        config.seed = s;
    }
    if let Some(e) = value_of(matches, "epsilon")? {
        config.epsilon = e;
    }
    Ok(config)
}

fn value_of<T: FromStr>(matches: &ArgMatches, name: &str) -> Result<Option<T>, String> {
    matches
        .value_of(name)
        .map(|v| v.parse().map_err(|_| format!("invalid value '{}' for --{}", v, name)))
        .transpose()
}

fn report(c: &Comparison) {
    println!("Derandomized 1/2 assignment (value = {:.6}):", c.half.weight);
    println!("{}", c.half.valuation);
    println!("Derandomized LP-rounding assignment (value = {:.6}):", c.lp_rounding.weight);
    println!("{}", c.lp_rounding.valuation);

    println!("LP variable probabilities:");
    let probabilities: Vec<String> = c.lp.probabilities.iter().map(|p| format!("{:.6}", p)).collect();
    println!("{}", probabilities.join(" "));
    if c.lp.fallback {
        println!("LP relaxation unbounded; rounded with uniform probabilities.");
    } else {
        println!("LP relaxation bound = {:.6}", c.lp.bound);
    }

    if let Some(s) = &c.sampled {
        println!("Best of {} sampled roundings (value = {:.6}):", s.samples, s.weight);
        println!("{}", s.valuation);
    }

    match &c.brute_force {
        BruteForce::Optimal { weight, valuation } => {
            println!("Brute-force optimal value = {:.6}", weight);
            println!("Brute-force optimal assignment:");
            println!("{}", valuation);
        }
        BruteForce::Skipped { .. } => println!("Brute-force exact solution skipped (n too large)."),
    }

    println!();
    println!("Timings:");
    println!("  derandomized 1/2 build time: {} us", c.timings.half.as_micros());
    println!("  LP build+solve time: {} us", c.timings.lp_solve.as_micros());
    println!("  derandomized LP-rounding time: {} us", c.timings.lp_rounding.as_micros());
    if c.sampled.is_some() {
        println!("  sampled rounding time: {} us", c.timings.sampling.as_micros());
    }
    println!("  brute-force time: {} us", c.timings.brute_force.as_micros());
}

const BENCHMARK_REPEATS: u32 = 1000;

fn report_benchmark(f: &Instance, config: &Config) {
    println!("Measurements are all below 1 microsecond (too small to measure on this input).");
    println!(
        "Running a short averaged micro-benchmark ({} repeats) to get measurable times...",
        BENCHMARK_REPEATS
    );
    let t = benchmark(f, config, BENCHMARK_REPEATS);
    println!("Averaged micro-benchmark (per repeat):");
    println!("  derandomized 1/2 (avg): {:.6} us", t.half.as_secs_f64() * 1e6);
    println!("  LP build+solve (avg):    {:.6} us", t.lp_solve.as_secs_f64() * 1e6);
    println!("  derand rounding (avg):  {:.6} us", t.lp_rounding.as_secs_f64() * 1e6);
}
