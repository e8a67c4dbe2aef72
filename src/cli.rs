use std::env;
use std::io::{self, Write};
use embeddb::{EmbedDB, Metadata};

pub enum Command {
    Insert { id: String, vec: Vec<f32>, metadata: Metadata },
    Search { vec: Vec<f32>, k_top: usize },
    Get { id: String },
    List,
    Count,
    Delete { id: String },
    Save { path: String },
    Load { path: String },
}

/// Parse a command from a provided argument vector
/// This is used both for command-line args and REPL input
pub fn parse_command_from_args(args: &[String]) -> Result<Command, String> {
    if args.len() < 2 {
        return Err("No command provided. Use: get, insert, search, list, count, delete, save, load".to_string());
    }

    let command = &args[1];

    match command.as_str() {
        "get" => parse_get(args),
        "insert" => parse_insert(args),
        "search" => parse_search(args),
        "list" => parse_list(args),
        "count" => parse_count(args),
        "delete" => parse_delete(args),
        "save" => parse_save(args),
        "load" => parse_load(args),
        _ => Err(format!("Unknown command: {}. Available: get, insert, search, list, count, delete, save, load", command)),
    }
}

fn parse_vector(parts: &[String]) -> Result<Vec<f32>, String> {
    parts.iter()
        .map(|s| s.parse::<f32>().map_err(|_| format!("Invalid vector component: '{}'", s)))
        .collect()
}

/// Parse the 'insert' command
/// Usage: embeddb insert <id> <vector> [--meta <json>]
fn parse_insert(args: &[String]) -> Result<Command, String> {
    // args[2] = id, args[3..] = vector, optionally followed by --meta and a JSON object
    if args.len() < 4 {
        return Err("'insert' command requires an ID and a vector. Usage: insert <id> <vector> [--meta <json>]".to_string());
    }

    let id = args[2].clone();
    let meta_pos = args.iter().position(|a| a == "--meta").unwrap_or(args.len());

    let metadata = if meta_pos < args.len() {
        // REPL input is split on whitespace, so glue the JSON back together
        let json = args[meta_pos + 1..].join(" ");
        serde_json::from_str(&json).map_err(|e| format!("Invalid --meta JSON: {}", e))?
    } else {
        Metadata::new()
    };

    let vec = parse_vector(&args[3..meta_pos])?;
    if vec.is_empty() {
        return Err("Insert vector cannot be empty".to_string());
    }

    Ok(Command::Insert { id, vec, metadata })
}

/// Parse the 'search' command
/// Usage: embeddb search <v1> <v2> ... [--k_top <number>]
fn parse_search(args: &[String]) -> Result<Command, String> {
    if args.len() < 3 {
        return Err("'search' command requires at least one vector component. Usage: search <v1> <v2> ... [--k_top <number>]".to_string());
    }

    let mut k_top = 5; // default value
    let mut vector_end = args.len();

    // Check if last two args are --k_top and a number
    if args.len() >= 4 && args[args.len() - 2] == "--k_top" {
        match args[args.len() - 1].parse::<usize>() {
            Ok(k) => {
                k_top = k;
                vector_end = args.len() - 2;
            }
            Err(_) => {
                return Err(format!("Invalid --k_top value: '{}'. Must be a non-negative integer.", args[args.len() - 1]));
            }
        }
    }

    let vec = parse_vector(&args[2..vector_end])?;
    if vec.is_empty() {
        return Err("Search vector cannot be empty".to_string());
    }
    Ok(Command::Search { vec, k_top })
}

/// Parse the 'get' command
/// Usage: embeddb get <id>
fn parse_get(args: &[String]) -> Result<Command, String> {
    if args.len() < 3 {
        return Err("'get' command requires an ID. Usage: get <id>".to_string());
    }

    Ok(Command::Get { id: args[2].clone() })
}

/// Parse the 'list' command
fn parse_list(args: &[String]) -> Result<Command, String> {
    if args.len() > 2 {
        eprintln!("Warning: 'list' command takes no arguments, ignoring extras");
    }

    Ok(Command::List)
}

/// Parse the 'count' command
fn parse_count(args: &[String]) -> Result<Command, String> {
    if args.len() > 2 {
        eprintln!("Warning: 'count' command takes no arguments, ignoring extras");
    }

    Ok(Command::Count)
}

/// Parse the 'delete' command
/// Usage: embeddb delete <id>
fn parse_delete(args: &[String]) -> Result<Command, String> {
    if args.len() < 3 {
        return Err("'delete' command requires an ID. Usage: delete <id>".to_string());
    }
    Ok(Command::Delete { id: args[2].clone() })
}

/// Parse the 'save' command
/// Usage: embeddb save <path>
fn parse_save(args: &[String]) -> Result<Command, String> {
    if args.len() < 3 {
        return Err("'save' command requires a file path. Usage: save <path>".to_string());
    }
    Ok(Command::Save { path: args[2].clone() })
}

/// Parse the 'load' command
/// Usage: embeddb load <path>
fn parse_load(args: &[String]) -> Result<Command, String> {
    if args.len() < 3 {
        return Err("'load' command requires a file path. Usage: load <path>".to_string());
    }
    Ok(Command::Load { path: args[2].clone() })
}

/// REPL mode - interactive session with persistent database
pub fn run_repl(db: &mut EmbedDB) {
    println!("EmbedDB - Vector Database");
    println!("Type 'help' for commands, 'exit' or 'quit' to quit\n");

    loop {
        print!("embeddb> ");
        if let Err(error) = io::stdout().flush() {
            eprintln!("Error writing prompt: {}", error);
        }

        let mut input = String::new();
        match io::stdin().read_line(&mut input) {
            Ok(0) => break,
            Ok(_) => {}
            Err(error) => {
                eprintln!("Error reading input: {}", error);
                continue;
            }
        }

        let input = input.trim();
        if input.is_empty() {
            continue;
        }

        if input == "exit" || input == "quit" {
            println!("Goodbye!");
            break;
        }

        if input == "help" {
            print_help();
            continue;
        }

        let mut args: Vec<String> = vec!["embeddb".to_string()];
        args.extend(input.split_whitespace().map(|s| s.to_string()));

        let command = match parse_command_from_args(&args) {
            Ok(cmd) => cmd,
            Err(error) => {
                eprintln!("Error: {}", error);
                continue;
            }
        };

        execute_command(db, command);
    }
}

/// Single-command mode - load db from path, execute command, save back
/// Usage: embeddb <db_path> <command> [args...]
pub fn run_single_command() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 3 {
        eprintln!("Usage: embeddb <db_path> <command> [args...]");
        std::process::exit(1);
    }

    let db_path = &args[1];

    // Load existing db or create new
    let mut db = if std::path::Path::new(db_path).exists() {
        match EmbedDB::load(db_path) {
            Ok(loaded) => loaded,
            Err(e) => {
                eprintln!("Error loading '{}': {}", db_path, e);
                std::process::exit(1);
            }
        }
    } else {
        EmbedDB::new()
    };

    // Rebuild args: shift so args[1] becomes the command
    let shifted_args: Vec<String> = std::iter::once(args[0].clone())
        .chain(args[2..].iter().cloned())
        .collect();

    let command = match parse_command_from_args(&shifted_args) {
        Ok(cmd) => cmd,
        Err(error) => {
            eprintln!("Error: {}", error);
            std::process::exit(1);
        }
    };

    execute_command(&mut db, command);

    if let Err(e) = db.save(db_path) {
        eprintln!("Error saving '{}': {}", db_path, e);
        std::process::exit(1);
    }
}

fn format_metadata(metadata: &Metadata) -> String {
    serde_json::to_string(metadata).unwrap_or_else(|_| "{}".to_string())
}

fn execute_command(db: &mut EmbedDB, command: Command) {
    match command {
        Command::Get { id } => {
            match db.get(&id) {
                Ok((vector, metadata)) => {
                    println!("Vector '{}': {:?}", id, vector);
                    println!("Metadata: {}", format_metadata(&metadata));
                }
                Err(error) => eprintln!("Error: {}", error),
            }
        }

        Command::List => {
            let records = db.records();
            if records.is_empty() {
                println!("Database is empty");
            } else {
                println!("Stored vectors:");
                for record in &records {
                    println!("  {}: {:?} {}", record.id, record.vector, format_metadata(&record.metadata));
                }
                println!("Total: {} vectors", records.len());
            }
        }

        Command::Count => println!("{}", db.count()),

        Command::Insert { id, vec, metadata } => {
            let existed = db.contains(&id);
            match db.add_vector(id.clone(), vec, metadata) {
                Ok(()) if existed => println!("Updated vector with id: {}", id),
                Ok(()) => println!("Inserted vector with id: {}", id),
                Err(error) => eprintln!("Error: {}", error),
            }
        }

        Command::Search { vec, k_top } => {
            match db.search_vector(&vec, k_top) {
                Ok(results) => {
                    if results.is_empty() {
                        println!("No results found");
                    } else {
                        println!("Top {} results:", results.len());
                        for (rank, hit) in results.iter().enumerate() {
                            println!("{}. ID: {}, Score: {:.4}, Metadata: {}",
                                rank + 1, hit.id, hit.similarity, format_metadata(&hit.metadata));
                        }
                    }
                }
                Err(error) => eprintln!("Error: {}", error),
            }
        }

        Command::Delete { id } => {
            match db.delete(&id) {
                Ok(()) => println!("Deleted vector with id: {}", id),
                Err(error) => eprintln!("Error: {}", error),
            }
        }

        Command::Save { path } => {
            match db.save(&path) {
                Ok(()) => println!("Database saved to '{}'", path),
                Err(error) => eprintln!("Error: {}", error),
            }
        }

        Command::Load { path } => {
            match EmbedDB::load(&path) {
                Ok(loaded_db) => {
                    let count = loaded_db.count();
                    *db = loaded_db;
                    println!("Database loaded from '{}' ({} vectors)", path, count);
                }
                Err(error) => eprintln!("Error: {}", error),
            }
        }
    }
}

fn print_help() {
    println!("Available commands:");
    println!("  insert <id> <v1> <v2> ... [--meta <json>] - Insert or replace a vector");
    println!("  search <v1> <v2> ... [--k_top N]          - Search for similar vectors (default k=5)");
    println!("  get <id>                                  - Retrieve a vector and its metadata");
    println!("  list                                      - List all vectors");
    println!("  count                                     - Show vector count");
    println!("  delete <id>                               - Delete a vector");
    println!("  save <path>                               - Save database to a JSON file");
    println!("  load <path>                               - Load database from a JSON file");
    println!("  help                                      - Show this help");
    println!("  exit, quit                                - Exit the program");
}
