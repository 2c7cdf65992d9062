extern crate structopt;

use std::path::PathBuf;
use std::process::exit;

use structopt::StructOpt;

use lfric_psygen::arglist::KernCallArgs;
use lfric_psygen::gen::gen_call;
use lfric_psygen::meta::load_call_site;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "lfric-psygen",
    about = "Generates PSy-layer kernel-call argument lists for LFRic kernels."
)]
enum App {
    #[structopt(about = "Checks that a kernel call-site description is valid")]
    Lint {
        #[structopt(long, parse(from_os_str), default_value = "./kerncall")]
        call_file: PathBuf,
    },
    #[structopt(about = "Generates the PSy-layer call for a kernel call site")]
    Gen {
        #[structopt(long, parse(from_os_str), default_value = "./kerncall")]
        call_file: PathBuf,
    },
}

fn main() {
    let app = App::from_args();

    match app {
        App::Lint { call_file } => match load_call_site(&call_file) {
            Ok(kern) => {
                println!("kernel `{}`: {} argument(s)", kern.name, kern.args.len());
            }
            Err(()) => exit(1),
        },

        App::Gen { call_file } => {
            let kern = match load_call_site(&call_file) {
                Ok(kern) => kern,
                Err(()) => exit(1),
            };
            let mut args = KernCallArgs::new(kern);
            if let Err(e) = args.generate() {
                eprintln!("{}", e);
                exit(1)
            }
            match gen_call(&args) {
                Ok(code) => println!("{}", code),
                Err(e) => {
                    eprintln!("{}", e);
                    exit(1)
                }
            }
        }
    }
}
