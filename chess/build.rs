use std::path::Path;
use std::{env, io};

mod magic {
    use std::io::{self, BufWriter, Write};
    use std::{fs, path::Path};

    use magicmove_base::magic::{self, XorShift32};

    fn write_consts<W: Write>(w: &mut W, name: &str, consts: &[u64; 64]) -> io::Result<()> {
        writeln!(w, "pub(crate) const {}_MAGICS: [u64; 64] = [", name)?;
        for (i, m) in consts.iter().enumerate() {
            writeln!(w, "    /*{:2}*/ 0x{:016x},", i, m)?;
        }
        writeln!(w, "];")?;
        Ok(())
    }

    pub fn gen(out_path: &Path) -> io::Result<()> {
        let (bishop, rook) = magic::find_all_magics(&mut XorShift32::new())
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
        let f = fs::File::create(out_path)?;
        let mut w = BufWriter::new(&f);
        write_consts(&mut w, "BISHOP", &bishop)?;
        writeln!(w)?;
        write_consts(&mut w, "ROOK", &rook)?;
        Ok(())
    }
}

fn main() -> io::Result<()> {
    println!("cargo:rerun-if-changed=build.rs");

    let out_dir = env::var("OUT_DIR").map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;

    magic::gen(&Path::new(&out_dir).join("magic.rs"))?;

    Ok(())
}
