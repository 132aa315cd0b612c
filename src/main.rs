use clap::Parser;
use owo_colors::OwoColorize;
use pseudocode::cli::{generate_completions, Args, Commands};
use pseudocode::config::AppConfig;
use pseudocode::diagnostic::render_diagnostics;
use pseudocode::format::{memory_table, render_memory};
use pseudocode::interpreter::{
    Error, InputProvider, Interpreter, ScriptedInput, StdinInput, StdoutSink,
};
use pseudocode::lexer::tokenize;
use pseudocode::parse_program;
use std::io::{self, Read};
use std::path::Path;
use std::thread;

/// Stack for the thread that parses and runs the program. Deep recursion in
/// an unoptimized build must reach the call-depth limit before the host stack.
const INTERPRETER_STACK_SIZE: usize = 512 * 1024 * 1024;

fn main() {
    let args = Args::parse();
    let worker = thread::Builder::new()
        .name("pseudo".to_string())
        .stack_size(INTERPRETER_STACK_SIZE)
        .spawn(move || run(args));

    match worker {
        Ok(handle) => {
            if handle.join().is_err() {
                std::process::exit(101);
            }
        }
        Err(e) => {
            eprintln!("Failed to start interpreter thread: {}", e);
            std::process::exit(1);
        }
    }
}

fn run(args: Args) {
    if let Some(Commands::Complete { shell }) = args.command {
        generate_completions(shell);
        return;
    }

    let config = AppConfig::from_args(&args);

    verbose_log(&config, "Starting pseudo");

    let (source, file_name) = match read_program(&args, &config) {
        Ok(program) => program,
        Err(e) => {
            error_message(&config, &e);
            std::process::exit(1);
        }
    };

    verbose_log(&config, &format!("Read {} bytes of program text", source.len()));

    if args.tokens {
        dump_tokens(&source, &file_name, &config);
        return;
    }

    let program = match parse_program(&source) {
        Ok(program) => program,
        Err(e) => report(&source, &file_name, &e, &config),
    };

    verbose_log(
        &config,
        &format!("Parsed {} top-level items", program.items.len()),
    );

    if args.ast {
        println!("{:#?}", program);
        return;
    }

    if args.check {
        println!("{}: ok", file_name);
        return;
    }

    let input: Box<dyn InputProvider> = match read_inputs(&args, &config) {
        Ok(Some(values)) => Box::new(ScriptedInput::new(values)),
        Ok(None) => {
            verbose_log(&config, "INPUT reads from stdin");
            Box::new(StdinInput)
        }
        Err(e) => {
            error_message(&config, &e);
            std::process::exit(1);
        }
    };

    let mut interpreter = Interpreter::new(input, StdoutSink);
    if config.trace {
        interpreter.set_observer(|stmt, memory| {
            eprintln!("[pseudo:trace] after {}", stmt.keyword());
            for line in memory_table(memory).lines() {
                eprintln!("[pseudo:trace]   {}", line);
            }
        });
    }

    let result = interpreter.run(&program);

    if let Some(format) = config.memory {
        verbose_log(&config, "Dumping final memory");
        println!("{}", render_memory(interpreter.memory(), format, config.compact).trim_end());
    }

    match result {
        Ok(()) => verbose_log(&config, "Program finished"),
        Err(e) => report(&source, &file_name, &Error::from(e), &config),
    }
}

fn read_program(args: &Args, config: &AppConfig) -> Result<(String, String), String> {
    if let Some(file) = &args.file {
        verbose_log(config, &format!("Reading program from file: {}", file.display()));
        let source = read_file(file)?;
        Ok((source, file.display().to_string()))
    } else {
        verbose_log(config, "Reading program from stdin");
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|e| format!("Failed to read from stdin: {}", e))?;

        if buffer.trim().is_empty() {
            return Err("No program provided. Pass a FILE or pipe the program via stdin".to_string());
        }

        Ok((buffer, "<stdin>".to_string()))
    }
}

/// Scripted INPUT values, or `None` when INPUT should prompt interactively.
fn read_inputs(args: &Args, config: &AppConfig) -> Result<Option<Vec<String>>, String> {
    if let Some(path) = &args.input_file {
        verbose_log(config, &format!("Reading INPUT values from: {}", path.display()));
        let text = read_file(path)?;
        return Ok(Some(text.lines().map(str::to_string).collect()));
    }
    if !args.input.is_empty() {
        verbose_log(config, &format!("Using {} scripted INPUT values", args.input.len()));
        return Ok(Some(args.input.clone()));
    }
    if args.file.is_none() {
        // stdin already held the program text
        return Ok(Some(Vec::new()));
    }
    Ok(None)
}

fn dump_tokens(source: &str, file_name: &str, config: &AppConfig) {
    match tokenize(source) {
        Ok(tokens) => {
            verbose_log(config, &format!("Scanned {} tokens", tokens.len()));
            for token in tokens {
                println!(
                    "{:>4}:{:<4} {:<10} {}",
                    token.line,
                    token.column,
                    format!("{:?}", token.kind()),
                    token.text()
                );
            }
        }
        Err(e) => report(source, file_name, &Error::from(e), config),
    }
}

fn report(source: &str, file_name: &str, error: &Error, config: &AppConfig) -> ! {
    if let Some(line) = error.line() {
        verbose_log(config, &format!("Error implicates line {}", line));
    }
    let rendered = render_diagnostics(
        source,
        file_name,
        &[error.to_diagnostic()],
        config.color_enabled,
    );
    eprint!("{}", rendered);
    std::process::exit(1);
}

fn read_file(path: &Path) -> Result<String, String> {
    std::fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {}", path.display(), e))
}

fn verbose_log(config: &AppConfig, message: &str) {
    if config.verbose {
        eprintln!("[pseudo:debug] {}", message);
    }
}

fn error_message(config: &AppConfig, message: &str) {
    if config.color_enabled {
        eprintln!("{}", message.red().bold());
    } else {
        eprintln!("{}", message);
    }
}
