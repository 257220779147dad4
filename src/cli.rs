use std::fs;
use std::io::{self, Read, Write};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};

use crate::{ExpressionParser, ToElement, parse};

#[derive(Parser)]
#[command(name = "fes-expression")]
#[command(about = "A CLI for reading and writing OGC Filter Encoding expressions")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Initialise logging. `RUST_LOG` wins if set; otherwise `--verbose`
    /// shows debug diagnostics and the default shows warnings.
    pub fn init_logging(&self) {
        let level = if self.verbose() { "debug" } else { "warn" };
        let env = env_logger::Env::default().default_filter_or(level);
        let _ = env_logger::Builder::from_env(env).try_init();
    }

    fn verbose(&self) -> bool {
        match &self.command {
            Commands::Convert { verbose, .. }
            | Commands::Explain { verbose, .. }
            | Commands::Validate { verbose, .. } => *verbose,
        }
    }

    pub fn run(self) -> Result<()> {
        let (input, output) = match &self.command {
            Commands::Convert { input, output, .. }
            | Commands::Explain { input, output, .. }
            | Commands::Validate { input, output, .. } => (input, output),
        };
        let reader =
            get_reader(input).with_context(|| format!("Failed to open input file: {input}"))?;
        let writer =
            get_writer(output).with_context(|| format!("Failed to create output file: {output}"))?;
        self.run_with_io(reader, writer)
    }

    /// Run CLI with provided readers and writers for testing
    pub fn run_with_io<R: Read, W: Write>(&self, reader: R, writer: W) -> Result<()> {
        let input_text = read_text_input(reader)?;
        match &self.command {
            Commands::Convert { .. } => self.run_convert(&input_text, writer),
            Commands::Explain { .. } => self.run_explain(&input_text, writer),
            Commands::Validate { .. } => self.run_validate(&input_text, writer),
        }
    }

    fn run_convert<W: Write>(&self, input_text: &str, writer: W) -> Result<()> {
        let expression =
            parse(input_text).with_context(|| "Failed to parse input as an FES expression")?;
        let output = expression
            .serialize()
            .with_context(|| "Failed to write expression as XML")?;
        write_text_output(writer, &output)?;

        log::info!("Converted {} expression", expression.xml_entity_name());
        Ok(())
    }

    fn run_explain<W: Write>(&self, input_text: &str, writer: W) -> Result<()> {
        let expression =
            parse(input_text).with_context(|| "Failed to parse input as an FES expression")?;
        write_text_output(writer, &format!("{expression}\n"))
    }

    fn run_validate<W: Write>(&self, input_text: &str, writer: W) -> Result<()> {
        let expression =
            parse(input_text).with_context(|| "Failed to parse input as an FES expression")?;

        // Write and read back; the result must be the same expression.
        let output = expression.serialize()?;
        let reparsed = ExpressionParser::parse_str(&output)
            .with_context(|| "Failed to re-parse serialized expression")?;
        if reparsed.as_ref() != Some(&expression) {
            bail!("Expression changed after a serialize/parse roundtrip:\n{output}");
        }

        write_text_output(writer, &format!("valid: {expression}\n"))
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Parse an XML expression and write it back as normalised, indented XML
    Convert {
        /// Input file (use - for stdin)
        #[arg(short, long, default_value = "-")]
        input: String,
        /// Output file (use - for stdout)
        #[arg(short, long, default_value = "-")]
        output: String,
        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
    /// Write an XML expression in compact text form, e.g. add($a, '1')
    Explain {
        /// Input file (use - for stdin)
        #[arg(short, long, default_value = "-")]
        input: String,
        /// Output file (use - for stdout)
        #[arg(short, long, default_value = "-")]
        output: String,
        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
    /// Validate an XML expression by parsing and serializing it (roundtrip test)
    Validate {
        /// Input file (use - for stdin)
        #[arg(short, long, default_value = "-")]
        input: String,
        /// Output file (use - for stdout)
        #[arg(short, long, default_value = "-")]
        output: String,
        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

/// Read text input from reader
fn read_text_input<R: Read>(mut reader: R) -> Result<String> {
    let mut buffer = String::new();
    reader.read_to_string(&mut buffer)?;
    Ok(buffer)
}

/// Write text output to writer
fn write_text_output<W: Write>(mut writer: W, content: &str) -> Result<()> {
    writer.write_all(content.as_bytes())?;
    Ok(())
}

/// Helper function to get reader from file path (or stdin if "-")
fn get_reader(path: &str) -> Result<Box<dyn Read>> {
    if path == "-" {
        Ok(Box::new(io::stdin()))
    } else {
        Ok(Box::new(fs::File::open(path)?))
    }
}

/// Helper function to get writer from file path (or stdout if "-")
fn get_writer(path: &str) -> Result<Box<dyn Write>> {
    if path == "-" {
        Ok(Box::new(io::stdout()))
    } else {
        Ok(Box::new(fs::File::create(path)?))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    const FUNCTION_XML: &str = r#"<fes:Function xmlns:fes="http://www.opengis.net/fes/2.0" name="add"><fes:ValueReference>gml:height</fes:ValueReference><fes:Literal type="xs:int">5</fes:Literal></fes:Function>"#;

    fn convert() -> Commands {
        Commands::Convert {
            input: String::new(),  // Not used in run_with_io
            output: String::new(), // Not used in run_with_io
            verbose: false,
        }
    }

    fn run(command: Commands, input: &str) -> Result<String> {
        let cli = Cli { command };
        let mut output = Vec::new();
        cli.run_with_io(Cursor::new(input), &mut output)?;
        Ok(String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_convert_pretty_prints() {
        let output = run(convert(), FUNCTION_XML).unwrap();
        assert!(output.contains(" name=\"add\">\n"));
        assert!(output.contains("\n  <fes:ValueReference>gml:height</fes:ValueReference>\n"));
        assert!(output.contains("\n  <fes:Literal type=\"xs:int\">5</fes:Literal>\n"));
        assert!(output.ends_with("</fes:Function>\n"));
    }

    #[test]
    fn test_convert_is_stable() {
        let once = run(convert(), FUNCTION_XML).unwrap();
        let twice = run(convert(), &once).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_explain() {
        let command = Commands::Explain {
            input: String::new(),
            output: String::new(),
            verbose: false,
        };
        let output = run(command, FUNCTION_XML).unwrap();
        assert_eq!(output, "add($gml:height, '5':xs:int)\n");
    }

    #[test]
    fn test_validate_command() {
        let command = Commands::Validate {
            input: String::new(),
            output: String::new(),
            verbose: true,
        };
        let output = run(command, FUNCTION_XML).unwrap();
        assert_eq!(output, "valid: add($gml:height, '5':xs:int)\n");
    }

    #[test]
    fn test_invalid_input_reports_context() {
        let xml = r#"<fes:ValueReference xmlns:fes="http://www.opengis.net/fes/2.0">a b</fes:ValueReference>"#;
        let err = run(convert(), xml).unwrap_err();
        assert!(format!("{err:#}").contains("Failed to parse input as an FES expression"));
        assert!(format!("{err:#}").contains("gml property name"));
    }
}
