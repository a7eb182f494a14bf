use std::fs;
use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Args, Parser, Subcommand};

use foldermenu_access::{AccessResolver, DirectoryHandle};
use foldermenu_config::{ConfigId, ConfigStore, FolderReference, MenuConfiguration};
use foldermenu_menu::{
    row_style, DisplayContext, EventStamp, MenuNode, MenuProjector, Row,
};

#[derive(Parser)]
#[command(
    name = "foldermenu-cli",
    about = "Inspect and drive FolderMenu folder-menu configurations",
    author,
    version
)]
struct Cli {
    /// 設定清單的儲存檔案。 / Configuration store file.
    #[arg(
        long,
        global = true,
        value_name = "PATH",
        default_value = "foldermenu.json"
    )]
    store: PathBuf,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 為資料夾新增一個選單設定。 / Add a menu configuration for a folder.
    Add(AddArgs),
    /// 列出所有設定。 / List all configurations.
    List,
    /// 依識別碼移除設定。 / Remove a configuration by identifier.
    Remove(RemoveArgs),
    /// 將設定的選單樹渲染為縮排文字。 / Render a configuration's menu tree as indented text.
    Show(ShowArgs),
}

#[derive(Args)]
struct AddArgs {
    /// 要顯示為選單的資料夾。 / Folder to present as a menu.
    folder: PathBuf,

    /// 狀態列顯示的標題；預設為資料夾名稱。 / Status-item title; defaults to the folder name.
    #[arg(long)]
    title: Option<String>,
}

#[derive(Args)]
struct RemoveArgs {
    /// 要移除的設定識別碼。 / Identifier of the configuration to remove.
    id: String,
}

#[derive(Args)]
struct ShowArgs {
    /// 要渲染的設定識別碼。 / Identifier of the configuration to render.
    id: String,

    /// 遞迴展開的子選單深度。 / How many submenu levels to expand.
    #[arg(long, default_value_t = 2)]
    depth: usize,

    /// 以未購買狀態渲染（套用免費版截斷與升級提示）。 / Render as unpurchased (free-tier cap and upsell rows).
    #[arg(long)]
    unpurchased: bool,

    /// 在最上層加入選項區塊，如同次要點擊。 / Include the options block, as a secondary click would.
    #[arg(long)]
    options: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let store = ConfigStore::new(&cli.store);

    match cli.command {
        Commands::Add(args) => add(&store, args),
        Commands::List => list(&store),
        Commands::Remove(args) => remove(&store, args),
        Commands::Show(args) => show(&store, args),
    }
}

fn add(store: &ConfigStore, args: AddArgs) -> Result<()> {
    let metadata = fs::metadata(&args.folder)
        .with_context(|| format!("cannot read folder {}", args.folder.display()))?;
    if !metadata.is_dir() {
        bail!("{} is not a directory", args.folder.display());
    }

    let title = args.title.unwrap_or_else(|| {
        args.folder
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "Folder".to_string())
    });
    let mut configuration =
        MenuConfiguration::new(title, FolderReference::for_directory(&args.folder));
    configuration.sanitize();

    store
        .upsert(configuration.clone())
        .context("failed to persist configuration")?;
    println!("added {} \"{}\"", configuration.id, configuration.title);
    Ok(())
}

fn list(store: &ConfigStore) -> Result<()> {
    let configurations = store.load().context("failed to load configurations")?;
    if configurations.is_empty() {
        println!("no configurations");
        return Ok(());
    }
    for configuration in configurations {
        let path = configuration
            .folder
            .candidate_path()
            .map(|path| path.display().to_string())
            .unwrap_or_else(|_| "<stale reference>".to_string());
        println!(
            "{}\t{}\t{}",
            configuration.id, configuration.title, path
        );
    }
    Ok(())
}

fn remove(store: &ConfigStore, args: RemoveArgs) -> Result<()> {
    let id = ConfigId::from_string(args.id);
    let before = store.load()?.len();
    let remaining = store.remove(&id).context("failed to update store")?;
    if remaining.len() == before {
        bail!("no configuration with id {id}");
    }
    println!("removed {id}");
    Ok(())
}

fn show(store: &ConfigStore, args: ShowArgs) -> Result<()> {
    let configurations = store.load().context("failed to load configurations")?;
    let configuration = configurations
        .iter()
        .find(|configuration| configuration.id.as_str() == args.id)
        .ok_or_else(|| anyhow!("no configuration with id {}", args.id))?;

    let style = row_style(configuration);
    log::debug!(
        "rendering {} at {} pt, icons {:?}",
        configuration.id,
        style.font_pt,
        style.icon_px
    );

    let mut resolver = AccessResolver::new();
    let mut projector = MenuProjector::new();
    let mut events = EventCounter::default();

    let root_path = configuration.folder.candidate_path()?;
    let mut root = MenuNode::new(&root_path);
    let ctx = DisplayContext {
        purchased: !args.unpurchased,
        show_options: args.options,
        highlighted: true,
        event: Some(events.next()),
    };
    projector.refresh_root(&mut root, configuration, &mut resolver, &ctx);

    println!("{}", configuration.title);
    match resolver.resolve(configuration) {
        Ok(scope) => render_node(
            &mut projector,
            &mut root,
            &scope,
            configuration,
            &ctx,
            &mut events,
            args.depth,
            1,
        ),
        Err(_) => print_rows(root.rows(), 1),
    }

    resolver.release_all();
    Ok(())
}

/// Hands out one fresh display-event stamp per expansion, standing in for
/// the host's input events.
#[derive(Default)]
struct EventCounter(u64);

impl EventCounter {
    fn next(&mut self) -> EventStamp {
        self.0 += 1;
        EventStamp(self.0)
    }
}

#[allow(clippy::too_many_arguments)]
fn render_node(
    projector: &mut MenuProjector,
    node: &mut MenuNode,
    scope: &DirectoryHandle,
    configuration: &MenuConfiguration,
    ctx: &DisplayContext,
    events: &mut EventCounter,
    depth: usize,
    indent: usize,
) {
    print_rows(node.rows(), indent);
    if depth == 0 {
        return;
    }

    let submenu_targets: Vec<PathBuf> = node
        .rows()
        .iter()
        .filter_map(|row| match row {
            Row::Entry(entry) if entry.has_submenu => Some(entry.target.clone()),
            _ => None,
        })
        .collect();

    for target in submenu_targets {
        if let Some(child) = node.child_mut(&target) {
            let child_ctx = DisplayContext {
                show_options: false,
                event: Some(events.next()),
                ..*ctx
            };
            projector.refresh_node(child, scope, configuration, &child_ctx);
            println!("{}▾ {}", "  ".repeat(indent), target.display());
            render_node(
                projector,
                child,
                scope,
                configuration,
                &child_ctx,
                events,
                depth - 1,
                indent + 1,
            );
        }
    }
}

fn print_rows(rows: &[Row], indent: usize) {
    let pad = "  ".repeat(indent);
    for row in rows {
        match row {
            Row::Entry(entry) if entry.has_submenu => println!("{pad}{} ▸", entry.title),
            Row::Entry(entry) => println!("{pad}{}", entry.title),
            Row::Action(action) => println!("{pad}[{}]", action.title),
            Row::Separator => println!("{pad}──────"),
            Row::Message(text) => println!("{pad}({text})"),
        }
    }
}
