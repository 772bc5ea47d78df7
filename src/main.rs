use clap::{arg,crate_version,Command};
use huffpress::{huff,convert};
type STDRESULT = Result<(),Box<dyn std::error::Error>>;

const RCH: &str = "unreachable was reached";

fn ok_to_overwrite(path_out: &str,force: bool) -> bool {
    if force {
        return true;
    }
    if let Ok(_f) = std::fs::File::open(path_out) {
        let mut ans = String::new();
        eprint!("{} exists, overwrite? (y/n) ",path_out);
        std::io::stdin().read_line(&mut ans).expect("could not read stdin");
        return ans.trim_end()=="y" || ans.trim_end()=="Y";
    }
    true
}

/// archive entry is named after the input file
fn entry_name(path_in: &str) -> String {
    match std::path::Path::new(path_in).file_name() {
        Some(name) => name.to_string_lossy().to_string(),
        None => path_in.to_string()
    }
}

fn io_command(name: &'static str,about: &'static str) -> Command {
    Command::new(name)
        .arg(arg!(-i --input <PATH> "input path").required(true))
        .arg(arg!(-o --output <PATH> "output path").required(true))
        .arg(arg!(-f --force "overwrite output without asking"))
        .about(about)
}

fn run() -> STDRESULT
{
    let long_help =
"Examples:
---------
Compress:      `huffpress compress -i notes.txt -o notes.huf`
Expand:        `huffpress expand -i notes.huf -o notes.txt`
Archive:       `huffpress huf2zip -i notes.huf -o notes.zip`
To text:       `huffpress zip2txt -i notes.zip -o notes.txt`";

    let main_cmd = Command::new("huffpress")
        .about("Compress and expand with static Huffman coding, convert to and from zip or text")
        .after_long_help(long_help)
        .version(crate_version!())
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(io_command("compress","compress any file to .huf"))
        .subcommand(io_command("expand","expand a .huf file").visible_alias("decompress"))
        .subcommand(io_command("huf2zip","store a .huf file in a zip archive"))
        .subcommand(io_command("zip2huf","extract the first .huf entry of a zip archive"))
        .subcommand(io_command("huf2txt","expand a .huf file that holds text"))
        .subcommand(io_command("zip2txt","expand the first .huf entry of a zip archive to text"))
        .subcommand(io_command("txt2zip","store a text file in a zip archive"))
        .subcommand(io_command("unzip-txt","extract the first .txt entry of a zip archive"));

    let matches = main_cmd.get_matches();
    let (name,cmd) = matches.subcommand().expect(RCH);
    let path_in = cmd.get_one::<String>("input").expect(RCH);
    let path_out = cmd.get_one::<String>("output").expect(RCH);
    if !ok_to_overwrite(path_out,cmd.get_flag("force")) {
        eprintln!("abort operation");
        return Ok(());
    }
    let dat = std::fs::read(path_in)?;
    log::debug!("{}: read {} bytes from {}",name,dat.len(),path_in);
    // the whole result is computed before the output file is touched
    let ans = match name {
        "compress" => huff::compress_slice(&dat,&huff::STD_OPTIONS)?,
        "expand" => huff::expand_slice(&dat,&huff::STD_OPTIONS)?,
        "huf2zip" => convert::huf_to_zip(&dat,&entry_name(path_in))?,
        "zip2huf" => convert::zip_to_huf(&dat)?,
        "huf2txt" => convert::huf_to_txt(&dat)?,
        "zip2txt" => convert::zip_to_txt(&dat)?,
        "txt2zip" => convert::txt_to_zip(&dat,&entry_name(path_in))?,
        "unzip-txt" => convert::unzip_txt(&dat)?,
        _ => {
            eprintln!("{} not supported",name);
            return Err(Box::new(std::fmt::Error));
        }
    };
    std::fs::write(path_out,&ans)?;
    let verb = match name {
        "compress" => "compressed",
        "expand" => "expanded",
        _ => "converted"
    };
    eprintln!("{} {} into {}",verb,dat.len(),ans.len());
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    if let Err(e) = run() {
        eprintln!("error: {}",e);
        std::process::exit(1);
    }
}
