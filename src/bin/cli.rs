//! Binary entry point for `sombra-query`, which prints query documents as JSON.
#![forbid(unsafe_code)]

use std::error::Error;
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde_json::Value;
use sombra_client::{
    config::ClientConfig,
    query::{
        ast::{QueryId, QueryIds},
        value::DbKeyValue,
        Coercer, IntegerPolicy, QueryBuilder, QueryType,
    },
};
use tracing::debug;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(
    name = "sombra-query",
    version,
    about = "Build Sombra query documents from the command line",
    disable_help_subcommand = true
)]
struct Cli {
    #[arg(
        long,
        global = true,
        value_name = "FILE",
        env = "SOMBRA_CLIENT_CONFIG",
        help = "Client config file"
    )]
    config: Option<PathBuf>,

    #[arg(
        long,
        global = true,
        value_enum,
        help = "How bare integers are tagged (overrides the config)"
    )]
    integers: Option<IntegersArg>,

    #[arg(long, global = true, help = "Print single-line JSON")]
    compact: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    #[command(about = "Coerce a JSON value into a tagged database value")]
    Value {
        #[arg(value_name = "JSON")]
        json: String,
    },

    #[command(about = "Build InsertValues from JSON records carrying db_id")]
    Element {
        #[arg(value_name = "FILE", help = "Record file, or - for stdin")]
        input: String,
    },

    #[command(about = "Build InsertNodes")]
    Nodes(NodesCmd),

    #[command(about = "Build InsertEdges")]
    Edges(EdgesCmd),

    #[command(about = "Build SelectValues")]
    Select {
        #[arg(long, num_args = 1.., required = true, allow_negative_numbers = true, value_name = "ID")]
        ids: Vec<String>,

        #[arg(long = "key", value_name = "KEY", help = "Keys to select (all when omitted)")]
        keys: Vec<String>,
    },

    #[command(about = "Build Remove")]
    Remove {
        #[arg(long, num_args = 1.., required = true, allow_negative_numbers = true, value_name = "ID")]
        ids: Vec<String>,
    },

    #[command(subcommand, about = "Inspect or edit the client config")]
    Config(ConfigCmd),
}

#[derive(Args, Debug)]
struct NodesCmd {
    #[arg(long, default_value_t = 1, help = "Number of nodes (ignored with --alias)")]
    count: u64,

    #[arg(long = "alias", value_name = "ALIAS")]
    aliases: Vec<String>,

    #[arg(long = "value", value_name = "KEY=JSON", help = "Value set on every node")]
    values: Vec<String>,
}

#[derive(Args, Debug)]
struct EdgesCmd {
    #[arg(long, num_args = 1.., required = true, allow_negative_numbers = true, value_name = "ID")]
    from: Vec<String>,

    #[arg(long, num_args = 1.., required = true, allow_negative_numbers = true, value_name = "ID")]
    to: Vec<String>,

    #[arg(long, help = "Connect every origin to every destination")]
    each: bool,

    #[arg(long = "value", value_name = "KEY=JSON", help = "Value set on every edge")]
    values: Vec<String>,
}

#[derive(Subcommand, Debug)]
enum ConfigCmd {
    #[command(about = "Print the effective config as TOML")]
    Show,

    #[command(about = "Print the config file location")]
    Path,

    #[command(about = "Write server, token or coercion settings")]
    Set {
        #[arg(long, requires_all = ["owner", "database"])]
        url: Option<String>,

        #[arg(long, requires = "url")]
        owner: Option<String>,

        #[arg(long, requires = "url")]
        database: Option<String>,

        #[arg(long)]
        token: Option<String>,
    },
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum IntegersArg {
    Signed,
    Unsigned,
}

impl From<IntegersArg> for IntegerPolicy {
    fn from(arg: IntegersArg) -> Self {
        match arg {
            IntegersArg::Signed => IntegerPolicy::Signed,
            IntegersArg::Unsigned => IntegerPolicy::Unsigned,
        }
    }
}

fn main() {
    install_tracing_subscriber();
    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn install_tracing_subscriber() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn run() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let mut config = ClientConfig::load(cli.config.clone())?;
    let policy = cli
        .integers
        .map(IntegerPolicy::from)
        .unwrap_or_else(|| config.integer_policy());
    let coercer = Coercer::new(policy);
    debug!(policy = ?policy, "cli.start");

    match cli.command {
        Command::Value { json } => {
            let native: Value = serde_json::from_str(&json)?;
            let value = coercer.to_db_value(&native)?;
            emit(cli.compact, &value)?;
        }
        Command::Element { input } => {
            let query = build_elements(&coercer, &read_input(&input)?)?;
            emit(cli.compact, &query)?;
        }
        Command::Nodes(cmd) => {
            let values = parse_values(&coercer, &cmd.values)?;
            let query = build_nodes(cmd.count, cmd.aliases, values);
            emit(cli.compact, &query)?;
        }
        Command::Edges(cmd) => {
            let values = parse_values(&coercer, &cmd.values)?;
            let query = build_edges(parse_ids(&cmd.from), parse_ids(&cmd.to), cmd.each, values);
            emit(cli.compact, &query)?;
        }
        Command::Select { ids, keys } => {
            let ids = parse_ids(&ids);
            let query = if keys.is_empty() {
                QueryBuilder::select().ids(ids).query()
            } else {
                QueryBuilder::select().values(keys).ids(ids).query()
            };
            emit(cli.compact, &query)?;
        }
        Command::Remove { ids } => {
            emit(cli.compact, &QueryBuilder::remove().ids(parse_ids(&ids)).query())?;
        }
        Command::Config(ConfigCmd::Show) => {
            print!("{}", config.to_toml()?);
        }
        Command::Config(ConfigCmd::Path) => match config.path() {
            Some(path) => println!("{}", path.display()),
            None => println!("(none)"),
        },
        Command::Config(ConfigCmd::Set {
            url,
            owner,
            database,
            token,
        }) => {
            if let (Some(url), Some(owner), Some(database)) = (url, owner, database) {
                config.set_server(&url, &owner, &database);
            }
            if let Some(token) = token {
                config.set_token(Some(&token));
            }
            if let Some(integers) = cli.integers {
                config.set_integer_policy(integers.into());
            }
            let path = config.persist()?;
            println!("Saved config to {}", path.display());
        }
    }

    Ok(())
}

fn read_input(input: &str) -> Result<String, Box<dyn Error>> {
    if input == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        Ok(fs::read_to_string(input)?)
    }
}

fn build_elements(coercer: &Coercer, raw: &str) -> Result<QueryType, Box<dyn Error>> {
    let records = match serde_json::from_str::<Value>(raw)? {
        Value::Array(records) => records,
        record => vec![record],
    };
    let insert = QueryBuilder::insert().with_coercer(*coercer);
    Ok(insert.elements(&records)?.query())
}

fn build_nodes(count: u64, aliases: Vec<String>, values: Vec<DbKeyValue>) -> QueryType {
    let nodes = QueryBuilder::insert().nodes();
    match (aliases.is_empty(), values.is_empty()) {
        (true, true) => nodes.count(count).query(),
        (true, false) => nodes.count(count).values_uniform(values).query(),
        (false, true) => nodes.aliases(aliases).query(),
        (false, false) => nodes.aliases(aliases).values_uniform(values).query(),
    }
}

fn build_edges(from: QueryIds, to: QueryIds, each: bool, values: Vec<DbKeyValue>) -> QueryType {
    let edges = QueryBuilder::insert().edges().from(from).to(to);
    match (each, values.is_empty()) {
        (false, true) => edges.query(),
        (false, false) => edges.values_uniform(values).query(),
        (true, true) => edges.each().query(),
        (true, false) => edges.each().values_uniform(values).query(),
    }
}

fn parse_ids(raw: &[String]) -> QueryIds {
    QueryIds::Ids(raw.iter().map(|id| parse_id(id)).collect())
}

fn parse_id(raw: &str) -> QueryId {
    match raw.parse::<i64>() {
        Ok(id) => QueryId::from(id),
        Err(_) => QueryId::from(raw),
    }
}

/// `key=JSON` pairs; a value that is not valid JSON is taken as a string.
fn parse_values(coercer: &Coercer, raw: &[String]) -> Result<Vec<DbKeyValue>, Box<dyn Error>> {
    let mut values = Vec::with_capacity(raw.len());
    for pair in raw {
        let (key, value) = pair
            .split_once('=')
            .ok_or_else(|| format!("expected KEY=JSON, got '{pair}'"))?;
        let native =
            serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
        if let Some(value) = coercer.to_db_value(&native)? {
            values.push(DbKeyValue::from((key, value)));
        }
    }
    Ok(values)
}

fn emit<T: serde::Serialize>(compact: bool, value: &T) -> Result<(), Box<dyn Error>> {
    let json = if compact {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };
    println!("{json}");
    Ok(())
}
