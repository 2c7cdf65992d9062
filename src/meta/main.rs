use std::fs::read_to_string;
use std::path::Path;
use std::rc::Rc;

use crate::kern::KernelCall;

use super::ast_parse::parse_call_site;
use super::compile::compile_call_site;
use super::sess::Sess;

/// Loads the call-site description at the given path.
/// Prints errors on stderr.
pub fn load_call_site(path: &Path) -> Result<Rc<KernelCall>, ()> {
    load_call_site_source(
        path.to_str().expect("file path is not valid UTF-8"),
        &read_to_string(path).expect("cannot read file"),
    )
}

/// Loads a call-site description from an in-memory source.
pub fn load_call_site_source(name: &str, source: &str) -> Result<Rc<KernelCall>, ()> {
    let mut code_map = codemap::CodeMap::new();

    let file = code_map.add_file(name.into(), source.into());

    let sess = Sess::new(&file);

    let mut dgns = Vec::new();

    let call = parse_call_site(sess.file.clone().source(), &mut dgns)
        .and_then(|site| compile_call_site(&site, &mut dgns));

    for d in dgns {
        eprintln!("{}", d.diagnostic_message(&sess));
    }

    call
}
