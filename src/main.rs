use chrono::Utc;
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use tabled::{settings::Style, Table, Tabled};

use gstbill::config::{
    config_dir, init_config_dir, load_bill, load_profiles, load_settings, save_profiles,
    LoadedBill, NewProfile, ProfileUpdate, Settings, SAMPLE_BILL_FILE,
};
use gstbill::delivery::{CommandShare, Deliver, Delivered, DeliveryStrategy, Platform};
use gstbill::error::{BillError, Result};
use gstbill::invoice::{assemble, format_money, format_rate, summarize, InvoiceData};
use gstbill::pdf::{export_pdf, FontScale, Orientation, PaperSize};
use gstbill::print::{print_markup, printable_document, SpoolSurface};
use gstbill::render::{render, TemplateVariant, Theme, RUPEE};

#[derive(Parser)]
#[command(name = "gstbill")]
#[command(version, about = "GST bill generator for small shops", long_about = None)]
struct Cli {
    /// Path to config directory (default: ~/.gstbill or XDG config)
    #[arg(short = 'C', long, global = true)]
    config_dir: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize config directory with template files
    Init,

    /// Show the billable items and GST totals of a bill
    Summary {
        /// Bill file (TOML)
        bill: PathBuf,
    },

    /// Render a bill with one of the invoice templates
    Preview {
        /// Bill file (TOML)
        bill: PathBuf,

        /// Template: classic, modern, simple, itemized
        #[arg(short, long)]
        template: Option<String>,

        /// Theme: blue, green, orange, purple
        #[arg(long)]
        theme: Option<String>,

        /// Emit the rendered document tree as JSON instead of HTML
        #[arg(long)]
        json: bool,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Export a bill as a paginated PDF
    Pdf {
        /// Bill file (TOML)
        bill: PathBuf,

        /// Theme: blue, green, orange, purple
        #[arg(long)]
        theme: Option<String>,

        /// Paper size: a4, a5, letter
        #[arg(long)]
        paper: Option<String>,

        /// Orientation: portrait, landscape
        #[arg(long)]
        orientation: Option<String>,

        /// Font size: small, medium, large
        #[arg(long)]
        font_size: Option<String>,

        /// Client user agent, used to decide between saving and sharing
        #[arg(long)]
        user_agent: Option<String>,

        /// Directory to save into (default: pdf.output_dir)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Open generated PDF with system default viewer
        #[arg(long)]
        open: bool,
    },

    /// Print a bill through the configured print command
    Print {
        /// Bill file (TOML)
        bill: PathBuf,

        /// Template: classic, modern, simple, itemized
        #[arg(short, long)]
        template: Option<String>,

        /// Theme: blue, green, orange, purple
        #[arg(long)]
        theme: Option<String>,
    },

    /// Manage saved shop profiles
    Profile {
        #[command(subcommand)]
        command: ProfileCommand,
    },
}

#[derive(Subcommand)]
enum ProfileCommand {
    /// Save a new shop profile
    Add {
        #[arg(long)]
        name: String,

        #[arg(long, default_value = "")]
        address: String,

        #[arg(long, default_value = "")]
        gstin: String,

        /// Make this the default profile
        #[arg(long)]
        default: bool,
    },

    /// List saved shop profiles
    List,

    /// Change fields of a saved profile
    Update {
        id: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        address: Option<String>,

        #[arg(long)]
        gstin: Option<String>,

        /// Make this the default profile
        #[arg(long, conflicts_with = "no_default")]
        default: bool,

        /// Stop using this profile as the default
        #[arg(long)]
        no_default: bool,
    },

    /// Make a profile the default
    Default { id: String },

    /// Delete a saved profile
    Remove { id: String },
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    gstbill::logging::init(cli.verbose);

    let cfg_dir = match cli.config_dir {
        Some(p) => p,
        None => config_dir()?,
    };

    match cli.command {
        Commands::Init => cmd_init(&cfg_dir),
        Commands::Summary { bill } => cmd_summary(&cfg_dir, &bill),
        Commands::Preview {
            bill,
            template,
            theme,
            json,
            output,
        } => cmd_preview(&cfg_dir, &bill, template, theme, json, output),
        Commands::Pdf {
            bill,
            theme,
            paper,
            orientation,
            font_size,
            user_agent,
            output_dir,
            open,
        } => cmd_pdf(
            &cfg_dir,
            &bill,
            PdfArgs {
                theme,
                paper,
                orientation,
                font_size,
                user_agent,
                output_dir,
            },
            open,
        ),
        Commands::Print {
            bill,
            template,
            theme,
        } => cmd_print(&cfg_dir, &bill, template, theme),
        Commands::Profile { command } => cmd_profile(&cfg_dir, command),
    }
}

/// Initialize config directory with template files
fn cmd_init(cfg_dir: &Path) -> Result<()> {
    init_config_dir(cfg_dir)?;

    println!("Initialized gstbill config at: {}", cfg_dir.display());
    println!();
    println!("Next steps:");
    println!(
        "  1. Save your shop details:   gstbill profile add --name \"My Shop\" --gstin <GSTIN> --default"
    );
    println!(
        "  2. Pick template and paper:  $EDITOR {}/config.toml",
        cfg_dir.display()
    );
    println!();
    println!("Then try the sample bill:");
    println!(
        "  gstbill pdf {}",
        cfg_dir.join(SAMPLE_BILL_FILE).display()
    );

    Ok(())
}

fn load_invoice(cfg_dir: &Path, bill: &Path) -> Result<(LoadedBill, InvoiceData)> {
    let profiles = load_profiles(cfg_dir)?;
    let loaded = load_bill(bill)?.resolve(&profiles)?;
    let data = assemble(&loaded.shop, &loaded.customer, &loaded.items);
    Ok((loaded, data))
}

fn resolve_theme(settings: &Settings, theme: Option<String>) -> Result<Theme> {
    theme
        .as_deref()
        .unwrap_or(&settings.defaults.theme)
        .parse()
}

fn resolve_template(settings: &Settings, template: Option<String>) -> TemplateVariant {
    TemplateVariant::from_name(template.as_deref().unwrap_or(&settings.defaults.template))
}

#[derive(Tabled)]
struct ItemRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "ITEM")]
    name: String,
    #[tabled(rename = "QTY")]
    quantity: u32,
    #[tabled(rename = "PRICE")]
    price: String,
    #[tabled(rename = "GST")]
    gst: String,
    #[tabled(rename = "TOTAL")]
    total: String,
}

#[derive(Tabled)]
struct ProfileRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "GSTIN")]
    gstin: String,
    #[tabled(rename = "CREATED")]
    created: String,
    #[tabled(rename = "DEFAULT")]
    default: String,
}

/// Show billable items and totals
fn cmd_summary(cfg_dir: &Path, bill: &Path) -> Result<()> {
    let (loaded, data) = load_invoice(cfg_dir, bill)?;
    let summary = summarize(&loaded.items);

    if !data.has_items() {
        println!("No billable items.");
        println!("Each item needs a name, a quantity and a price above zero.");
        return Ok(());
    }

    let rows: Vec<ItemRow> = data
        .items()
        .iter()
        .enumerate()
        .map(|(i, item)| ItemRow {
            index: i + 1,
            name: item.name().to_string(),
            quantity: item.quantity(),
            price: format_money(RUPEE, item.price()),
            gst: format!("{}%", format_rate(item.gst_rate())),
            total: format_money(RUPEE, item.total()),
        })
        .collect();

    let table = Table::new(rows).with(Style::rounded()).to_string();
    println!("{}", table);

    let skipped = loaded.items.len() - summary.billable_items;
    if skipped > 0 {
        println!("Skipped {} incomplete item(s)", skipped);
    }

    println!();
    println!("Items:        {}", summary.billable_items);
    println!("Total qty:    {}", summary.total_quantity);
    println!("Subtotal:     {}", format_money(RUPEE, summary.totals.subtotal));
    println!("Total GST:    {}", format_money(RUPEE, summary.totals.total_tax));
    println!("Grand total:  {}", format_money(RUPEE, summary.totals.grand_total));

    Ok(())
}

/// Render a bill as HTML or a JSON document tree
fn cmd_preview(
    cfg_dir: &Path,
    bill: &Path,
    template: Option<String>,
    theme: Option<String>,
    json: bool,
    output: Option<PathBuf>,
) -> Result<()> {
    let settings = load_settings(cfg_dir)?;
    let theme = resolve_theme(&settings, theme)?;
    let variant = resolve_template(&settings, template);
    let (_, data) = load_invoice(cfg_dir, bill)?;

    let document = render(&data, variant, theme)?;
    let content = if json {
        document.to_json()?
    } else {
        printable_document(&document.to_html())
    };

    match output {
        Some(path) => {
            fs::write(&path, content)?;
            println!("Wrote {} preview to: {}", variant, path.display());
        }
        None => println!("{}", content),
    }

    Ok(())
}

struct PdfArgs {
    theme: Option<String>,
    paper: Option<String>,
    orientation: Option<String>,
    font_size: Option<String>,
    user_agent: Option<String>,
    output_dir: Option<PathBuf>,
}

/// Export and deliver a PDF
fn cmd_pdf(cfg_dir: &Path, bill: &Path, args: PdfArgs, open: bool) -> Result<()> {
    let settings = load_settings(cfg_dir)?;
    let theme = resolve_theme(&settings, args.theme)?;

    let mut options = settings.pdf.options;
    if let Some(paper) = args.paper {
        options.paper_size = paper.parse::<PaperSize>()?;
    }
    if let Some(orientation) = args.orientation {
        options.orientation = orientation.parse::<Orientation>()?;
    }
    if let Some(font_size) = args.font_size {
        options.font_size = font_size.parse::<FontScale>()?;
    }

    let (_, data) = load_invoice(cfg_dir, bill)?;
    let file = export_pdf(&data, theme, &options, Utc::now())?;

    let user_agent = args
        .user_agent
        .or_else(|| settings.delivery.user_agent.clone())
        .unwrap_or_default();
    let platform = Platform::from_user_agent(&user_agent);
    let dir = args
        .output_dir
        .unwrap_or_else(|| settings.pdf.output_dir(cfg_dir));
    let share = CommandShare::new(settings.delivery.share_command.clone());

    let delivered = DeliveryStrategy::select(platform, share, dir).deliver(&file)?;
    match &delivered {
        Delivered::Saved(path) => println!("Saved PDF: {}", path.display()),
        Delivered::Shared(path) => println!("Shared PDF: {}", path.display()),
    }

    if open {
        open_path(delivered.path())?;
    }

    Ok(())
}

/// Print a rendered bill
fn cmd_print(
    cfg_dir: &Path,
    bill: &Path,
    template: Option<String>,
    theme: Option<String>,
) -> Result<()> {
    let settings = load_settings(cfg_dir)?;
    let theme = resolve_theme(&settings, theme)?;
    let variant = resolve_template(&settings, template);
    let (_, data) = load_invoice(cfg_dir, bill)?;

    let markup = render(&data, variant, theme)?.to_html();
    let surface = SpoolSurface::new(
        settings.print.spool_dir(cfg_dir),
        settings.print.command.clone(),
    );
    print_markup(Some(&markup), &surface, settings.print.settle_delay())?;

    if surface.has_command() {
        println!("Sent invoice {} to printer", data.invoice_number());
    } else {
        println!(
            "No print command configured. Printable page written to: {}",
            surface.dir().display()
        );
    }

    Ok(())
}

fn cmd_profile(cfg_dir: &Path, command: ProfileCommand) -> Result<()> {
    if !cfg_dir.exists() {
        return Err(BillError::ConfigNotFound(cfg_dir.to_path_buf()));
    }

    let mut store = load_profiles(cfg_dir)?;

    match command {
        ProfileCommand::List => {
            if store.list().is_empty() {
                println!("No shop profiles saved.");
                println!("Add one with: gstbill profile add --name \"My Shop\"");
                return Ok(());
            }

            let rows: Vec<ProfileRow> = store
                .list()
                .iter()
                .map(|p| ProfileRow {
                    id: p.id.clone(),
                    name: p.name.clone(),
                    gstin: p.gstin.clone(),
                    created: p.created_at.format("%Y-%m-%d").to_string(),
                    default: if p.is_default { "*".to_string() } else { String::new() },
                })
                .collect();

            let table = Table::new(rows).with(Style::rounded()).to_string();
            println!("{}", table);
            return Ok(());
        }
        ProfileCommand::Add {
            name,
            address,
            gstin,
            default,
        } => {
            let profile = store.add(
                NewProfile {
                    name,
                    address,
                    gstin,
                    is_default: default,
                },
                Utc::now(),
            );
            println!("Saved shop profile {} ({})", profile.name, profile.id);
        }
        ProfileCommand::Update {
            id,
            name,
            address,
            gstin,
            default,
            no_default,
        } => {
            let is_default = match (default, no_default) {
                (true, _) => Some(true),
                (_, true) => Some(false),
                _ => None,
            };
            let profile = store.update(
                &id,
                ProfileUpdate {
                    name,
                    address,
                    gstin,
                    is_default,
                },
            )?;
            println!("Updated shop profile {} ({})", profile.name, profile.id);
        }
        ProfileCommand::Default { id } => {
            store.set_default(&id)?;
            println!("Default shop profile is now {}", id);
        }
        ProfileCommand::Remove { id } => {
            let removed = store.remove(&id)?;
            println!("Removed shop profile {} ({})", removed.name, removed.id);
        }
    }

    save_profiles(cfg_dir, &store)
}

fn open_path(path: &Path) -> Result<()> {
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open").arg(path).spawn()?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open").arg(path).spawn()?;
    }

    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/C", "start", ""])
            .arg(path)
            .spawn()?;
    }
    Ok(())
}
