use anyhow::{Context, Error, Result};
use camino::Utf8PathBuf;
use clap::{ArgAction, Parser, ValueEnum};
use serde_json::Value;
use std::io::{self, IsTerminal, Write};
use std::process::ExitCode;
use std::time::Duration;
use termcolor::{BufferedStandardStream, Color, ColorChoice, ColorSpec, WriteColor};
use tracing::{debug, info};

use ipgeo_expansion::config::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
use ipgeo_expansion::input::RequestSource;
use ipgeo_expansion::request::{apply_default_api_key, build_envelope};
use ipgeo_expansion::{
    handler, introspection, logging, version, ClientConfig, IpAttributeType, IpGeolocationClient,
};

/// Check if the error chain contains a broken pipe error.
#[inline(always)]
fn is_broken_pipe(err: &Error) -> bool {
    for cause in err.chain() {
        if let Some(io_err) = cause.downcast_ref::<io::Error>() {
            if io_err.kind() == io::ErrorKind::BrokenPipe {
                return true;
            }
        }
    }
    false
}

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Treat every non-empty input line as a separate JSON request
    #[clap(long, conflicts_with = "ip")]
    lines: bool,

    /// Enrich this IP address instead of reading requests from input
    #[clap(long, value_name = "IP", conflicts_with = "input")]
    ip: Option<String>,

    /// Attribute type used with --ip
    #[clap(long, value_enum, default_value_t = ArgsAttributeType::IpSrc)]
    attribute_type: ArgsAttributeType,

    /// ipgeolocation.io API key, used when a request carries none of its own
    #[clap(long, value_name = "KEY", env = "IPGEOLOCATION_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Lookup endpoint
    #[clap(long, value_name = "URL", env = "IPGEOLOCATION_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// HTTP timeout in seconds
    #[clap(long, value_name = "SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout: u64,

    /// Ignore HTTPS_PROXY/HTTP_PROXY/ALL_PROXY and connect directly
    #[clap(long)]
    no_proxy: bool,

    /// Print the supported input types and output format, then exit
    #[clap(long, conflicts_with = "module_info")]
    introspection: bool,

    /// Print module metadata and recognized configuration options, then exit
    #[clap(long)]
    module_info: bool,

    /// Pretty-print JSON output
    #[clap(long)]
    pretty: bool,

    /// Highlight error responses
    #[clap(short = 'C', long, value_enum, default_value_t = ArgsColorChoice::Auto)]
    color: ArgsColorChoice,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace). RUST_LOG overrides
    #[clap(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Request file(s) to process. Leave empty or use "-" to read from stdin
    #[clap(value_name = "FILE", value_hint = clap::ValueHint::FilePath)]
    input: Vec<Utf8PathBuf>,
}

#[derive(Copy, Clone, PartialEq, Eq, Debug, ValueEnum)]
enum ArgsColorChoice {
    Always,
    Never,
    Auto,
}

#[derive(Copy, Clone, PartialEq, Eq, Debug, ValueEnum)]
enum ArgsAttributeType {
    IpSrc,
    IpDst,
}

impl From<ArgsAttributeType> for IpAttributeType {
    fn from(kind: ArgsAttributeType) -> Self {
        match kind {
            ArgsAttributeType::IpSrc => IpAttributeType::IpSrc,
            ArgsAttributeType::IpDst => IpAttributeType::IpDst,
        }
    }
}

/// Runs requests through the handler and writes one JSON document per
/// response.
struct Responder<'a> {
    client: IpGeolocationClient,
    api_key: Option<&'a str>,
    pretty: bool,
}

impl Responder<'_> {
    fn respond<W: WriteColor>(&self, out: &mut W, raw: Option<&str>) -> Result<()> {
        let response = match raw {
            Some(raw) => {
                let raw = match self.api_key {
                    Some(key) => apply_default_api_key(raw, key),
                    None => raw.to_string(),
                };
                handler(Some(raw.as_str()), &self.client)
            }
            None => handler(None, &self.client),
        };
        write_json(out, &response, self.pretty)
    }
}

/// Write a JSON value followed by a newline; error payloads are colored red.
fn write_json<W: WriteColor>(out: &mut W, value: &Value, pretty: bool) -> Result<()> {
    let is_error = value.get("error").is_some();
    if is_error {
        out.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true))?;
    }
    if pretty {
        serde_json::to_writer_pretty(&mut *out, value)?;
    } else {
        serde_json::to_writer(&mut *out, value)?;
    }
    if is_error {
        out.reset()?;
    }
    out.write_all(b"\n")?;
    Ok(())
}

fn main() -> ExitCode {
    let err = match run_main() {
        Ok(code) => return code,
        Err(err) => err,
    };

    // Handle broken pipe errors gracefully
    if is_broken_pipe(&err) {
        return ExitCode::SUCCESS;
    }

    // Print detailed error information based on environment variables
    let mut stderr = io::stderr();
    if std::env::var("RUST_BACKTRACE").is_ok_and(|v| v == "1")
        && std::env::var("RUST_LIB_BACKTRACE").map_or(true, |v| v == "1")
    {
        let _ = writeln!(stderr, "{:?}", err);
    } else {
        let _ = writeln!(stderr, "{:#}", err);
    }

    ExitCode::FAILURE
}

fn run_main() -> Result<ExitCode> {
    let mut args = Args::parse();
    logging::init_logging(args.verbose)?;

    // if no files specified, add stdin
    if args.input.is_empty() {
        args.input.push(Utf8PathBuf::from("-"));
    }

    // auto colors only when stdout is a tty
    let colormode = match args.color {
        ArgsColorChoice::Auto => {
            if io::stdout().is_terminal() {
                ColorChoice::Always
            } else {
                ColorChoice::Never
            }
        }
        ArgsColorChoice::Always => ColorChoice::Always,
        ArgsColorChoice::Never => ColorChoice::Never,
    };

    run(args, colormode)?;

    Ok(ExitCode::SUCCESS)
}

fn run(args: Args, colormode: ColorChoice) -> Result<()> {
    let mut out = BufferedStandardStream::stdout(colormode);

    if args.introspection {
        write_json(&mut out, &serde_json::to_value(introspection())?, args.pretty)?;
        out.flush()?;
        return Ok(());
    }

    if args.module_info {
        write_json(&mut out, &serde_json::to_value(version())?, args.pretty)?;
        out.flush()?;
        return Ok(());
    }

    let config = ClientConfig::default()
        .with_base_url(args.base_url.clone())
        .with_timeout(Duration::from_secs(args.timeout))
        .with_proxy_from_env(!args.no_proxy);
    debug!(base_url = %config.base_url, timeout = ?config.timeout, "client configured");

    let responder = Responder {
        client: IpGeolocationClient::new(&config),
        api_key: args.api_key.as_deref(),
        pretty: args.pretty,
    };

    if let Some(ip) = args.ip.as_deref() {
        let raw = build_envelope(ip, args.attribute_type.into(), None).to_string();
        responder.respond(&mut out, Some(raw.as_str()))?;
        out.flush()?;
        return Ok(());
    }

    let mut handled = 0usize;
    for path in args.input.iter().cloned() {
        let source = RequestSource::from_path(path);
        let mut reader = source.reader()?;

        if args.lines {
            reader.for_each_request(|line| {
                handled += 1;
                responder.respond(&mut out, Some(line))
            })?;
        } else {
            let raw = reader
                .read_request()
                .with_context(|| format!("failed to read request from {}", source))?;
            let raw = Some(raw.as_str()).filter(|r| !r.trim().is_empty());
            handled += 1;
            responder.respond(&mut out, raw)?;
        }
        out.flush()?;
    }

    info!(requests = handled, "done");
    Ok(())
}
