#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

fn main() {
    let result = if std::env::args_os().count() <= 1 {
        slice_annotator::run_viewer()
    } else {
        slice_annotator::run_cli()
    };

    if let Err(error) = result {
        eprintln!("{error}");
        std::process::exit(1);
    }
}
