//! Shell completions and man pages for the `folio` binary.

use std::io::{self, Write};
use std::path::PathBuf;

use clap::CommandFactory;
use clap_complete::Shell;
use clap_mangen::Man;

use crate::Cli;

const BIN_NAME: &str = "folio";

fn write_completions(shell: Shell, out: &mut impl Write) {
    clap_complete::generate(shell, &mut Cli::command(), BIN_NAME, out);
}

fn render_page(man: Man) -> io::Result<Vec<u8>> {
    let mut page = Vec::new();
    man.render(&mut page)?;
    Ok(page)
}

/// One page for the binary, then one per subcommand, as `(file name, page)`.
fn man_pages() -> io::Result<Vec<(String, Vec<u8>)>> {
    let root = Cli::command();
    let mut pages = vec![(
        format!("{BIN_NAME}.1"),
        render_page(Man::new(root.clone()))?,
    )];

    for sub in root.get_subcommands() {
        let title = format!("{BIN_NAME}-{}", sub.get_name());
        let page = render_page(Man::new(sub.clone()).title(title.clone()))?;
        pages.push((format!("{title}.1"), page));
    }
    Ok(pages)
}

pub(crate) fn handle_completions(shell: Shell) -> Result<(), Box<dyn std::error::Error>> {
    write_completions(shell, &mut io::stdout().lock());
    Ok(())
}

pub(crate) fn handle_man(output: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let pages = man_pages()?;

    match output {
        Some(dir) => {
            std::fs::create_dir_all(&dir)?;
            for (file, page) in &pages {
                std::fs::write(dir.join(file), page)?;
            }
            println!("Generated {} man pages in: {}", pages.len(), dir.display());
        }
        None => {
            if let Some((_, page)) = pages.first() {
                io::stdout().lock().write_all(page)?;
            }
        }
    }

    Ok(())
}
