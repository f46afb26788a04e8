use clap::Parser;
use midinotes::freq::NoteTable;
use midinotes::output::{self, SongJson};
use midinotes::smf::{self, Song};
use midinotes::timeline::{self, Timeline};
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "midinotes")]
#[command(version = "0.1.0")]
#[command(about = "Extract note data from a MIDI file for a 4-voice square-wave generator", long_about = None)]
struct Args {
    /// Input Standard MIDI File
    #[arg(required_unless_present = "note_table")]
    input: Option<PathBuf>,

    /// Output file (writes to stdout if not specified)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Emit JSON instead of the sound-driver table format
    #[arg(long)]
    json: bool,

    /// Output compact JSON (default is pretty-printed)
    #[arg(short, long)]
    compact: bool,

    /// Print the note/counter table and exit
    #[arg(short = 'T', long)]
    note_table: bool,
}

fn main() -> Result<(), midinotes::Error> {
    let args = Args::parse();
    let table = NoteTable::new();

    if args.note_table {
        output::write_note_table(&mut io::stdout().lock(), &table)?;
        return Ok(());
    }

    let input = args
        .input
        .expect("input is required when not printing the note table");

    let data = std::fs::read(&input)?;
    eprintln!("Read {} bytes of {}", data.len(), input.display());

    let song = smf::parse(input.display().to_string(), &data)?;
    let timeline = timeline::encode(&song, &table);

    // surface every recoverable anomaly before the structured output
    print_diagnostics(&song, &timeline);

    match args.output {
        Some(path) => {
            let mut file = File::create(path)?;
            write_output(&mut file, args.json, args.compact, &song, &timeline)?;
        }
        None => {
            write_output(&mut io::stdout().lock(), args.json, args.compact, &song, &timeline)?;
        }
    }

    Ok(())
}

fn write_output<W: Write>(
    w: &mut W,
    json: bool,
    compact: bool,
    song: &Song,
    timeline: &Timeline,
) -> Result<(), midinotes::Error> {
    if json {
        let song_json = SongJson::new(song, timeline);
        let json_string = if compact {
            serde_json::to_string(&song_json)?
        } else {
            serde_json::to_string_pretty(&song_json)?
        };
        writeln!(w, "{}", json_string)?;
    } else {
        output::write_rows(w, timeline)?;
    }
    Ok(())
}

fn print_diagnostics(song: &Song, timeline: &Timeline) {
    if let Some(header) = song.header {
        eprintln!("format={}, #tracks={}", header.format, header.num_tracks);
        if header.smpte {
            eprintln!("SMPTE time coding");
        } else {
            eprintln!("quarter note = {} ticks", header.division);
        }
    }
    for track in &song.tracks {
        eprintln!(
            "track {}: {} events",
            track.name.as_deref().unwrap_or(""),
            track.events.len()
        );
    }
    for error in &song.errors {
        eprintln!("Error: {}", error);
    }
    eprintln!("note on count:  {}", timeline.note_on_count);
    eprintln!("note off count: {}", timeline.note_off_count);
    if timeline.zero_velocity_note_ons > 0 {
        eprintln!(
            "note on events with zero velocity: {}",
            timeline.zero_velocity_note_ons
        );
    }
}
