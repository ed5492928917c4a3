use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Arg, Command};
use furns_admin::config::ClientOptions;
use furns_admin::site::{Location, SiteOptions, StaticPage, Storefront};
use log::{error, info};

fn cli() -> Command<'static> {
    Command::new("furns-site")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Render the Furns storefront into a static HTML template")
        .arg(
            Arg::new("template")
                .short('t')
                .long("template")
                .value_name("FILE")
                .help("HTML template containing <!-- furns:SLOT --> markers")
                .takes_value(true)
                .required(true),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("FILE")
                .help("Where to write the rendered page")
                .takes_value(true)
                .required(true),
        )
        .arg(
            Arg::new("location")
                .short('l')
                .long("location")
                .value_name("URL")
                .help("Page address to render, e.g. single-product.html?id=42")
                .takes_value(true)
                .default_value("/index.html"),
        )
        .arg(
            Arg::new("category")
                .short('c')
                .long("category")
                .value_name("SLUG")
                .help("Render the grid filtered to one category")
                .takes_value(true),
        )
}

async fn run() -> furns_admin::Result<()> {
    let matches = cli().get_matches();
    // required args are enforced by clap
    let template_path = PathBuf::from(matches.value_of("template").unwrap_or_default());
    let output_path = PathBuf::from(matches.value_of("output").unwrap_or_default());
    let location = Location::parse(matches.value_of("location").unwrap_or("/index.html"))?;

    let client_options = ClientOptions::from_env()?;
    let storefront = Storefront::new(&client_options, SiteOptions::default())?;

    let template = tokio::fs::read_to_string(&template_path).await?;
    let mut page = StaticPage::storefront();

    let categories = storefront.initialize(&mut page, &location).await;
    if let Some(category) = matches.value_of("category") {
        storefront
            .select_category(&mut page, &categories, category)
            .await;
    }

    tokio::fs::write(&output_path, page.render_into(&template)).await?;
    info!(
        "wrote {} ({} DOM writes)",
        output_path.display(),
        page.writes()
    );
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    pretty_env_logger::init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
