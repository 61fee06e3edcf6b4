use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Search bookmarks
    Search {
        /// Search terms, matched against titles and urls
        #[clap(required = true)]
        terms: Vec<String>,

        /// Print results as json
        #[clap(long, default_value = "false")]
        json: bool,
    },
    /// Open the best matching bookmark in the browser
    Open {
        #[clap(required = true)]
        terms: Vec<String>,
    },
    /// Print every indexed bookmark
    List {
        /// Print bookmarks as json
        #[clap(long, default_value = "false")]
        json: bool,
    },
    /// Print the bookmark file that would be indexed
    Locate {},
    /// Keep the index live and answer one query per line from stdin
    Watch {
        /// Print results as json
        #[clap(long, default_value = "false")]
        json: bool,
    },
}
