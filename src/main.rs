use clap::{Arg, ArgAction, Command};
use tracing_subscriber::EnvFilter;

use cms_translations::{
    CapabilityRegistry, ContentTree, ItemId, MockMode, MockProvider, ProviderPayload,
    TranslationProvider, TranslationsConf, flatten, merge,
};

fn cli() -> Command {
    let content_arg = Arg::new("content")
        .help("Content-tree JSON file, as exported by the CMS")
        .required(true)
        .index(1);
    let item_arg = Arg::new("item")
        .long("item")
        .help("Item id used in group keys (default: 1)")
        .default_value("1");
    let source_arg = Arg::new("source")
        .long("source")
        .short('s')
        .help("Source language code")
        .default_value("en");
    let target_arg = Arg::new("target")
        .long("target")
        .short('t')
        .help("Target language code")
        .required(true);

    Command::new("cms-translations")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Export CMS content trees for translation and merge responses back")
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("Operator configuration (TOML)")
                .global(true),
        )
        .subcommand_required(true)
        .subcommand(
            Command::new("export")
                .about("Flatten a content tree into the provider payload")
                .arg(content_arg.clone())
                .arg(item_arg.clone())
                .arg(source_arg.clone())
                .arg(target_arg.clone()),
        )
        .subcommand(
            Command::new("roundtrip")
                .about("Run a content tree through the mock provider and print the merged result")
                .arg(content_arg.clone())
                .arg(item_arg.clone())
                .arg(source_arg.clone())
                .arg(target_arg.clone())
                .arg(
                    Arg::new("echo")
                        .long("echo")
                        .help("Return content unchanged instead of suffixing it")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("merge")
                .about("Merge a stored provider response back into a content tree")
                .arg(content_arg)
                .arg(item_arg)
                .arg(
                    Arg::new("response")
                        .help("Provider response JSON file")
                        .required(true)
                        .index(2),
                ),
        )
}

fn load_conf(matches: &clap::ArgMatches) -> cms_translations::Result<TranslationsConf> {
    match matches.get_one::<String>("config") {
        Some(path) => TranslationsConf::from_file(path),
        None => Ok(TranslationsConf::default()),
    }
}

fn load_items(
    matches: &clap::ArgMatches,
) -> cms_translations::Result<Vec<(ItemId, ContentTree)>> {
    let path = matches
        .get_one::<String>("content")
        .expect("content is a required argument");
    let item: ItemId = matches
        .get_one::<String>("item")
        .expect("item has a default")
        .parse()
        .map_err(|_| {
            cms_translations::TranslationsError::Config("--item must be an integer".to_owned())
        })?;

    let raw = std::fs::read_to_string(path)?;
    let tree: ContentTree = serde_json::from_str(&raw)?;
    Ok(vec![(item, tree)])
}

fn build_payload(
    matches: &clap::ArgMatches,
    registry: &CapabilityRegistry,
    conf: &TranslationsConf,
) -> cms_translations::Result<(Vec<(ItemId, ContentTree)>, ProviderPayload)> {
    let items = load_items(matches)?;
    let source = matches
        .get_one::<String>("source")
        .expect("source has a default");
    let target = matches
        .get_one::<String>("target")
        .expect("target is required");

    let groups = flatten(&items, registry, conf)?;
    let payload = ProviderPayload::from_groups(source, target, &groups)?;
    Ok((items, payload))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let matches = cli().get_matches();
    let conf = load_conf(&matches)?;
    let registry = CapabilityRegistry::from_conf(&conf);

    match matches.subcommand() {
        Some(("export", sub)) => {
            let (_, payload) = build_payload(sub, &registry, &conf)?;
            println!("{}", serde_json::to_string_pretty(&payload)?);
        }
        Some(("roundtrip", sub)) => {
            let (items, payload) = build_payload(sub, &registry, &conf)?;
            let mode = if sub.get_flag("echo") {
                MockMode::Echo
            } else {
                MockMode::Suffix
            };
            let response = MockProvider::new(mode).translate(&payload).await?;
            let merged = merge(&items, &response.into_groups()?, &registry, &conf)?;
            println!("{}", serde_json::to_string_pretty(&merged)?);
        }
        Some(("merge", sub)) => {
            let items = load_items(sub)?;
            let raw = std::fs::read_to_string(
                sub.get_one::<String>("response")
                    .expect("response is a required argument"),
            )?;
            let response: ProviderPayload = serde_json::from_str(&raw)?;
            let merged = merge(&items, &response.into_groups()?, &registry, &conf)?;
            println!("{}", serde_json::to_string_pretty(&merged)?);
        }
        _ => unreachable!("subcommand is required"),
    }

    Ok(())
}
