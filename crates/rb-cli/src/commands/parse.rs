use colored::Colorize;
use rb_parse::{Family, parse, render_parse_error};

pub fn run(family: &str, sentence: &str) -> Result<(), String> {
    let family: Family = family.parse()?;
    // Clause breaks typed on a shell line arrive as a literal backslash-n.
    let sentence = sentence.replace("\\n", "\n");

    match parse(family, &sentence) {
        Ok(tree) => {
            println!("  {} {}", "Parsed".green().bold(), family.to_string().dimmed());
            println!();
            println!("{tree:#?}");
            println!();
            println!("  {}", "Canonical form".bold().underline());
            for line in tree.to_string().lines() {
                println!("  {line}");
            }
            Ok(())
        }
        Err(error) => {
            eprint!("{}", render_parse_error("sentence", &error));
            Err(format!("not a {family} sentence"))
        }
    }
}
