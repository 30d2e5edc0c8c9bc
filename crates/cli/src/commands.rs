//! Clap command definition.
//!
//! Reproduces the original tool's flag surface (`--iterations --delay
//! --cw --key --mode --n_list`) and adds the local in-memory gateway
//! knobs (`--lag --page-size`) so staleness is demonstrable without a
//! real backend.

use clap::{Arg, Command};

/// Build the complete CLI command.
pub fn build_cli() -> Command {
    Command::new("staleprobe")
        .about("Eventual-consistency probe for object-storage backends")
        .allow_negative_numbers(true)
        .arg(
            Arg::new("iterations")
                .long("iterations")
                .help("Number of rounds to run; -1 means run forever")
                .value_parser(clap::value_parser!(i64))
                .default_value("1"),
        )
        .arg(
            Arg::new("delay")
                .long("delay")
                .help("Delay in milliseconds between the write and the first read")
                .value_parser(clap::value_parser!(u64))
                .default_value("0"),
        )
        .arg(
            Arg::new("cw")
                .long("cw")
                .help("Enable metric emission")
                .value_parser(clap::value_parser!(bool))
                .default_value("true"),
        )
        .arg(
            Arg::new("key")
                .long("key")
                .help("Key written in update mode")
                .default_value("testKey"),
        )
        .arg(
            Arg::new("mode")
                .long("mode")
                .help("Mode of operation for the test: [updateTest (default), listTest]")
                .default_value("updateTest"),
        )
        .arg(
            Arg::new("n_list")
                .long("n_list")
                .help("Number of keys per round for the list test")
                .value_parser(clap::value_parser!(usize))
                .default_value("100"),
        )
        .arg(
            Arg::new("lag")
                .long("lag")
                .help("In-memory gateway: observations a write stays invisible for")
                .value_parser(clap::value_parser!(u64))
                .default_value("0"),
        )
        .arg(
            Arg::new("page-size")
                .long("page-size")
                .help("In-memory gateway: maximum keys per listing page")
                .value_parser(clap::value_parser!(usize))
                .default_value("1000"),
        )
}
