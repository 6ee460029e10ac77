// Copyright 2025 The Zwcalc Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use std::fs;
use std::fs::File;
use std::io::Write;
use std::result::Result as StdResult;

use pico_args::Arguments;
use serde::Serialize;

use zwcalc_engine::{Calculation, ParsedRecord, compute, parse_block};

const VERSION: &str = "1.0";
const EXIT_FAILURE: i32 = 1;

#[macro_export]
macro_rules! die(
    ($($arg:tt)*) => { {
        use std;
        eprintln!($($arg)*);
        std::process::exit(EXIT_FAILURE)
    } }
);

fn usage() -> ! {
    let argv0 = std::env::args()
        .next()
        .unwrap_or_else(|| "<zwcalc>".to_string());
    die!(
        concat!(
            "zwcalc {}: Calculate one noisy text block.\n\
         \n\
         USAGE:\n",
            "    {} [OPTION...] [PATH]\n",
            "\n\
         With no PATH, the block is read from stdin.\n\
         \n\
         OPTIONS:\n",
            "    -h, --help       show this message\n",
            "    --demo           run the built-in demonstration blocks\n",
            "    --output FILE    path to write the result JSON\n",
        ),
        VERSION,
        argv0
    );
}

#[derive(Clone, Default, Debug)]
struct Args {
    path: Option<String>,
    output: Option<String>,
    is_demo: bool,
}

fn parse_args() -> StdResult<Args, Box<dyn std::error::Error>> {
    let mut parsed = Arguments::from_env();
    if parsed.contains(["-h", "--help"]) {
        usage();
    }

    let mut args: Args = Default::default();
    args.is_demo = parsed.contains("--demo");
    args.output = parsed.opt_value_from_str("--output")?;

    let free_arguments = parsed.finish();
    if let Some(path) = free_arguments.first() {
        args.path = path.to_str().map(|s| s.to_owned());
    }

    Ok(args)
}

const DEMO_BLOCKS: &[&str] = &[
    "ZiegelWagga: plus\nalpha: 2\nbeta: 3\n",
    "meaning: left->a, right->b, combine->op\nleft: 10\nright: 4\ncombine: minus\n",
    "compute: (3 + 5) * sqrt(16) - 7\n",
    "values: 1, 2, 3, 4, 5, 100\ndo: average\nextra: ZW ignores this line\n",
    "(12 + 8) / 5\n",
    "recipe: Chocolate Lava\nspice: cinnamon\nlhs: 6\nrhs: 7\noperation: times\n",
    "verb: power\nx: 2\ny: 8\n",
    "purple potato moonbeams\nbag: -1 2 -3 4 5.5\n",
];

fn run_demo() {
    for (i, block) in DEMO_BLOCKS.iter().enumerate() {
        let case = i + 1;
        match compute(&parse_block(block)) {
            Ok(calc) => println!("Case {}: {} = {}", case, calc.label, calc.value),
            Err(err) => println!("Case {}: error -> {}", case, err),
        }
    }
}

#[derive(Serialize)]
struct Output<'record> {
    operation: &'record str,
    result: f64,
    parsed: &'record ParsedRecord,
}

fn render(calc: &Calculation, record: &ParsedRecord) -> String {
    let output = Output {
        operation: &calc.label,
        result: calc.value,
        parsed: record,
    };
    serde_json::to_string_pretty(&output).unwrap()
}

fn main() {
    let args = match parse_args() {
        Ok(args) => args,
        Err(err) => {
            eprintln!("error: {}", err);
            usage();
        }
    };

    if args.is_demo {
        run_demo();
        return;
    }

    let file_path = args.path.unwrap_or_else(|| "/dev/stdin".to_string());
    let block = match fs::read_to_string(&file_path) {
        Ok(block) => block,
        Err(err) => die!("block '{}' error: {}", &file_path, err),
    };

    let record = parse_block(&block);
    let calc = match compute(&record) {
        Ok(calc) => calc,
        Err(err) => die!("error: {}", err),
    };

    let mut output_file =
        File::create(args.output.unwrap_or_else(|| "/dev/stdout".to_string())).unwrap();
    output_file
        .write_fmt(format_args!("{}\n", render(&calc, &record)))
        .unwrap();
}
