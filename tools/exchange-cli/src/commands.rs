//! Line commands understood by the console
//!
//! ```text
//! buy <symbol> <trader> <price> <qty>
//! sell <symbol> <trader> <price> <qty>
//! cancel <symbol> <order-id>
//! book [symbol] [depth]
//! depth [symbol] [levels]
//! trades [symbol]
//! use <symbol>
//! wallet <trader>
//! deposit <trader> <token> <amount>
//! withdraw <trader> <token> <amount>
//! inspect <hex-query>
//! mirror <hex-book-report>
//! q
//! ```

use std::fmt::Write as _;
use std::str::FromStr;

use anyhow::{anyhow, bail, Context};
use inspect_codec::decode_book_report;
use inspect_codec::wire::decode_hex_payload;
use matching_engine::book::{BookDepth, BookSnapshot};
use matching_engine::{Action, Divergence, MarketSession, Outcome};
use types::ids::{Address, OrderId};
use types::order::{Order, Side};
use types::trade::Trade;

const DEFAULT_DEPTH: usize = 10;

pub const HELP: &str = "\
Commands:
  buy <symbol> <trader> <price> <qty>
  sell <symbol> <trader> <price> <qty>
  cancel <symbol> <order-id>
  book [symbol] [depth]
  depth [symbol] [levels]
  trades [symbol]
  use <symbol>
  wallet <trader>
  deposit <trader> <token> <amount>
  withdraw <trader> <token> <amount>
  inspect <hex-query>
  mirror <hex-book-report>
  q
";

#[derive(Debug, PartialEq, Eq)]
pub enum Reply {
    Output(String),
    Quit,
}

/// Parse and run one console line against `session`
pub fn process_line(session: &mut MarketSession, line: &str) -> anyhow::Result<Reply> {
    let mut args = line.split_whitespace();
    let Some(cmd) = args.next() else {
        return Ok(Reply::Output(String::new()));
    };
    let args: Vec<&str> = args.collect();

    let out = match cmd {
        "q" | "quit" => return Ok(Reply::Quit),
        "help" | "?" => HELP.to_string(),
        "buy" => submit(session, Side::Buy, &args)?,
        "sell" => submit(session, Side::Sell, &args)?,
        "cancel" => {
            let [symbol, id] = expect_args::<2>("cancel", &args)?;
            let order_id = OrderId(parse(id, "order id")?);
            let outcome = session.dispatch(Action::CancelOrder {
                symbol: symbol.to_string(),
                order_id,
            })?;
            match outcome {
                Outcome::Cancelled { order: Some(order) } => {
                    format!("Cancelled order {} ({} remaining)\n", order.id, order.quantity)
                }
                _ => format!("No resting order {order_id} on {symbol}\n"),
            }
        }
        "book" => {
            let symbol = args
                .first()
                .map(|s| s.to_string())
                .unwrap_or_else(|| session.selected_symbol().to_string());
            let depth = match args.get(1) {
                Some(d) => parse(d, "depth")?,
                None => DEFAULT_DEPTH,
            };
            format_book(&session.engine().book_snapshot(&symbol, depth)?)
        }
        "depth" => {
            let symbol = args
                .first()
                .map(|s| s.to_string())
                .unwrap_or_else(|| session.selected_symbol().to_string());
            let levels = match args.get(1) {
                Some(l) => parse(l, "levels")?,
                None => DEFAULT_DEPTH,
            };
            format_depth(&session.engine().depth(&symbol, levels)?)
        }
        "trades" => {
            let symbol = args
                .first()
                .map(|s| s.to_string())
                .unwrap_or_else(|| session.selected_symbol().to_string());
            format_trades(&session.engine().transactions(&symbol)?)
        }
        "use" => {
            let [symbol] = expect_args::<1>("use", &args)?;
            session.dispatch(Action::SwitchSymbol { symbol: symbol.to_string() })?;
            format!("Selected {symbol}\n")
        }
        "wallet" => {
            let [trader] = expect_args::<1>("wallet", &args)?;
            let trader = parse_address(trader)?;
            let balances = session.engine().wallets().balances(&trader);
            if balances.is_empty() {
                format!("No wallet for trader {trader}\n")
            } else {
                balances.iter().fold(String::new(), |mut s, (token, qty)| {
                    let _ = writeln!(s, "{token}: {qty}");
                    s
                })
            }
        }
        "deposit" | "withdraw" => {
            let [trader, token, amount] = expect_args::<3>(cmd, &args)?;
            let trader = parse_address(trader)?;
            let token = parse_address(token)?;
            let amount: u64 = parse(amount, "amount")?;
            let wallets = session.engine().wallets();
            let balance = if cmd == "deposit" {
                wallets.deposit(trader, token, amount)?
            } else {
                wallets.withdraw(trader, token, amount)?
            };
            format!("{token}: {balance}\n")
        }
        "inspect" => {
            let [payload] = expect_args::<1>("inspect", &args)?;
            let query = decode_hex_payload(payload)?;
            let report = session.engine().inspect(&query)?;
            format!("0x{}\n", hex::encode(report))
        }
        "mirror" => {
            let [payload] = expect_args::<1>("mirror", &args)?;
            let report = decode_book_report(payload)?;
            let truncated = report.truncated;
            let symbol = report.symbol.clone();
            let outcome = session.dispatch(Action::UpdateBook { report })?;
            let mut out = String::new();
            if truncated {
                let _ = writeln!(out, "Report for {symbol} was truncated");
            }
            if let Outcome::BookMirrored { divergences } = outcome {
                out.push_str(&format_divergences(&symbol, &divergences));
            }
            out
        }
        other => bail!("invalid command: {other}"),
    };
    Ok(Reply::Output(out))
}

fn submit(session: &mut MarketSession, side: Side, args: &[&str]) -> anyhow::Result<String> {
    let [symbol, trader, price, qty] = expect_args::<4>(side_name(side), args)?;
    let order = Order::new(
        session.engine().next_order_id(),
        parse_address(trader)?,
        side,
        parse(price, "price")?,
        parse(qty, "quantity")?,
    );
    let order_id = order.id;

    let outcome = session.dispatch(Action::SubmitOrder {
        symbol: symbol.to_string(),
        order,
    })?;
    let mut out = format!("Accepted order {order_id}\n");
    if let Outcome::Submitted { trades } = outcome {
        out.push_str(&format_trades(&trades));
    }
    Ok(out)
}

fn side_name(side: Side) -> &'static str {
    match side {
        Side::Buy => "buy",
        Side::Sell => "sell",
    }
}

fn expect_args<'a, const N: usize>(cmd: &str, args: &[&'a str]) -> anyhow::Result<[&'a str; N]> {
    <[&str; N]>::try_from(args)
        .map_err(|_| anyhow!("{cmd} expects {N} argument(s), got {}", args.len()))
}

fn parse<T>(raw: &str, what: &str) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.parse().with_context(|| format!("invalid {what}: {raw}"))
}

fn parse_address(raw: &str) -> anyhow::Result<Address> {
    Ok(raw.parse::<Address>()?)
}

fn format_book(book: &BookSnapshot) -> String {
    let mut out = String::from("id\tqty\tbid | ask\tqty\tid\n");
    let rows = book.bids.len().max(book.asks.len());
    for i in 0..rows {
        match book.bids.get(i) {
            Some(b) => {
                let _ = write!(out, "{}\t{}\t{}", b.id, b.quantity, b.price);
            }
            None => out.push_str("\t\t"),
        }
        out.push_str(" | ");
        match book.asks.get(i) {
            Some(a) => {
                let _ = write!(out, "{}\t{}\t{}", a.price, a.quantity, a.id);
            }
            None => out.push_str("\t\t"),
        }
        out.push('\n');
    }
    out
}

fn format_depth(depth: &BookDepth) -> String {
    let mut out = String::from("qty\tbid | ask\tqty\n");
    let rows = depth.bids.len().max(depth.asks.len());
    for i in 0..rows {
        match depth.bids.get(i) {
            Some((price, qty)) => {
                let _ = write!(out, "{qty}\t{price}");
            }
            None => out.push('\t'),
        }
        out.push_str(" | ");
        if let Some((price, qty)) = depth.asks.get(i) {
            let _ = write!(out, "{price}\t{qty}");
        }
        out.push('\n');
    }
    out
}

fn format_trades(trades: &[Trade]) -> String {
    trades.iter().fold(String::new(), |mut s, t| {
        let _ = writeln!(
            s,
            "Trade #{}: {} @ {} (bid {} / ask {})",
            t.sequence, t.quantity, t.price, t.bid_order_id, t.ask_order_id
        );
        s
    })
}

fn format_divergences(symbol: &str, divergences: &[Divergence]) -> String {
    if divergences.is_empty() {
        return format!("Mirrored {symbol}: matches reference engine\n");
    }
    let mut out = format!("Mirrored {symbol}: {} divergence(s)\n", divergences.len());
    for d in divergences {
        let _ = match d {
            Divergence::Missing { remote } => {
                writeln!(out, "  order {} only on remote", remote.id)
            }
            Divergence::Unexpected { local } => {
                writeln!(out, "  order {} only in engine", local.id)
            }
            Divergence::Mismatch { remote, local } => writeln!(
                out,
                "  order {}: remote {}@{} engine {}@{}",
                remote.id, remote.quantity, remote.price, local.quantity, local.price
            ),
        };
    }
    out
}
