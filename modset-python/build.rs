/*!
Build configuration for the ModSet Python bindings.

Queries the Python interpreter the extension will be loaded into and checks
it against the minimum supported version before emitting link paths.
*/

use std::env;

use pyo3_build_config::{InterpreterConfig, PythonVersion};

const MINIMUM_PYTHON: PythonVersion = PythonVersion { major: 3, minor: 8 };

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=PYO3_PYTHON");
    println!("cargo:rerun-if-env-changed=PYTHON_SYS_EXECUTABLE");

    let interpreter = env::var("PYO3_PYTHON")
        .or_else(|_| env::var("PYTHON_SYS_EXECUTABLE"))
        .unwrap_or_else(|_| "python3".to_string());

    let config = match InterpreterConfig::from_interpreter(&interpreter) {
        Ok(config) => config,
        Err(err) => {
            // pyo3 resolves its own interpreter config; a failed probe here
            // only skips the extra link search path.
            println!("cargo:warning=could not query Python interpreter '{interpreter}': {err}");
            return;
        }
    };

    if config.version < MINIMUM_PYTHON {
        panic!(
            "Python {}.{} is below the minimum supported version {}.{}",
            config.version.major,
            config.version.minor,
            MINIMUM_PYTHON.major,
            MINIMUM_PYTHON.minor
        );
    }

    if let Some(lib_dir) = &config.lib_dir {
        println!("cargo:rustc-link-search=native={lib_dir}");
    }
}
