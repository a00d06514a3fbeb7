/*!
Python bindings for the ModSet preset round-trip engine.

This module provides a Pythonic interface to the Rust-based modset-core
library, letting a Python-hosted plugin encode modifier parameters, manage
preset slots and share one on-disk document format with the Rust tools.

## Example Usage

```python
import modset

# Encode live parameter values to the canonical JSON text
text = modset.encode_parameters({"levels": 2, "use_creases": True})

# Tolerant decode: malformed text yields an empty dict
params = modset.decode_parameters(text)

# Preset document management
preset_set = modset.load_preset_set("modset_prefs.json", "Preset1")
modset.save_preset_set("modset_prefs.json", "Preset1", preset_set)
print(modset.list_slots("modset_prefs.json"))
```
*/

use std::collections::{BTreeMap, BTreeSet};

use modset_core::normalize::normalize;
use modset_core::{
    HostValue, LocalFileStorage, ModsetError, ParameterSnapshot, PresetSet, PresetStore,
};
use pyo3::create_exception;
use pyo3::exceptions::{PyException, PyIOError, PyTypeError};
use pyo3::prelude::*;
use pyo3::types::{PyBool, PyDict, PyFloat, PyInt, PyList, PyModule, PySet, PyTuple};
use pyo3::IntoPyObjectExt;
use serde_json::Value as JsonValue;

// Define custom Python exception types
create_exception!(
    modset_python,
    PyModSetError,
    PyException,
    "Base exception for ModSet operations"
);
create_exception!(
    modset_python,
    PyStoreError,
    PyModSetError,
    "Preset storage operation failed"
);
create_exception!(
    modset_python,
    PyValidationError,
    PyModSetError,
    "Preset data failed validation"
);

/// Convert a Rust ModsetError to a Python exception
fn convert_error(err: ModsetError) -> PyErr {
    match err {
        ModsetError::Io(io_err) => PyIOError::new_err(format!("I/O error: {io_err}")),
        ModsetError::Json(json_err) => {
            PyModSetError::new_err(format!("JSON serialization error: {json_err}"))
        }
        ModsetError::InvalidFormat(msg) => {
            PyModSetError::new_err(format!("Invalid preset format: {msg}"))
        }
        ModsetError::UnknownKind(kind) => {
            PyValidationError::new_err(format!("Unknown modifier kind: {kind}"))
        }
        ModsetError::SlotNotFound(slot) => {
            use pyo3::exceptions::PyKeyError;
            PyKeyError::new_err(format!("Preset slot not found: {slot}"))
        }
        ModsetError::UnlinkedNodeGroup(name) => PyValidationError::new_err(format!(
            "Node group '{name}' is not linked from an asset library"
        )),
        ModsetError::Storage(msg) => {
            PyStoreError::new_err(format!("Storage operation failed: {msg}"))
        }
        ModsetError::Validation(msg) => {
            PyValidationError::new_err(format!("Validation error: {msg}"))
        }
    }
}

/// Map a Python value onto the host value model, best effort.
///
/// Types with no mapping become [`HostValue::Opaque`]; the normalizer turns
/// those into `null` and logs the type name once per occurrence.
fn py_to_host(value: &Bound<'_, PyAny>) -> HostValue {
    if value.is_none() {
        HostValue::None
    } else if value.is_instance_of::<PyBool>() {
        match value.extract::<bool>() {
            Ok(flag) => HostValue::Bool(flag),
            Err(_) => HostValue::Opaque("bool".to_string()),
        }
    } else if let Ok(int) = value.extract::<i64>() {
        HostValue::Int(int)
    } else if let Ok(float) = value.extract::<f64>() {
        HostValue::Float(float)
    } else if let Ok(text) = value.extract::<String>() {
        HostValue::Str(text)
    } else if let Ok(list) = value.downcast::<PyList>() {
        HostValue::List(list.iter().map(|item| py_to_host(&item)).collect())
    } else if let Ok(tuple) = value.downcast::<PyTuple>() {
        let items: Vec<Bound<'_, PyAny>> = tuple.iter().collect();
        let numeric = !items.is_empty()
            && items.iter().all(|item| {
                !item.is_instance_of::<PyBool>()
                    && (item.is_instance_of::<PyInt>() || item.is_instance_of::<PyFloat>())
            });
        if numeric {
            HostValue::Vector(
                items
                    .iter()
                    .filter_map(|item| item.extract::<f64>().ok())
                    .collect(),
            )
        } else {
            HostValue::List(items.iter().map(py_to_host).collect())
        }
    } else if let Ok(set) = value.downcast::<PySet>() {
        match set
            .iter()
            .map(|item| item.extract::<String>().ok())
            .collect::<Option<BTreeSet<String>>>()
        {
            Some(flags) => HostValue::EnumSet(flags),
            None => HostValue::Opaque("set".to_string()),
        }
    } else if let Ok(dict) = value.downcast::<PyDict>() {
        let mut entries = BTreeMap::new();
        for (key, item) in dict.iter() {
            let key = match key.str() {
                Ok(text) => text.to_string_lossy().into_owned(),
                Err(_) => continue,
            };
            entries.insert(key, py_to_host(&item));
        }
        HostValue::Map(entries)
    } else {
        let type_name = value
            .get_type()
            .name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|_| "object".to_string());
        HostValue::Opaque(type_name)
    }
}

/// Convert a JSON value into the equivalent Python object
fn json_to_py(py: Python<'_>, value: &JsonValue) -> PyResult<PyObject> {
    match value {
        JsonValue::Null => Ok(py.None()),
        JsonValue::Bool(flag) => flag.into_py_any(py),
        JsonValue::Number(number) => {
            if let Some(int) = number.as_i64() {
                int.into_py_any(py)
            } else if let Some(int) = number.as_u64() {
                int.into_py_any(py)
            } else {
                number.as_f64().unwrap_or(f64::NAN).into_py_any(py)
            }
        }
        JsonValue::String(text) => text.as_str().into_py_any(py),
        JsonValue::Array(items) => {
            let list = PyList::empty(py);
            for item in items {
                list.append(json_to_py(py, item)?)?;
            }
            Ok(list.into())
        }
        JsonValue::Object(entries) => {
            let dict = PyDict::new(py);
            for (key, item) in entries {
                dict.set_item(key.as_str(), json_to_py(py, item)?)?;
            }
            Ok(dict.into())
        }
    }
}

/// Convert an arbitrary Python value into its JSON-safe form
///
/// Applies the same rules the capture path uses: numeric tuples flatten to
/// number lists, string sets become sorted lists, containers convert
/// recursively and values with no JSON mapping become None.
///
/// # Arguments
/// * `value` - The Python value to convert
///
/// # Returns
/// The JSON-safe equivalent of the input
///
/// # Example
/// ```python
/// import modset
///
/// modset.safe_serialize((1.0, 2.0, 3.0))   # [1.0, 2.0, 3.0]
/// modset.safe_serialize({"EDGE", "VERT"})  # ["EDGE", "VERT"]
/// ```
#[pyfunction]
#[pyo3(signature = (value))]
fn safe_serialize(py: Python<'_>, value: &Bound<'_, PyAny>) -> PyResult<PyObject> {
    let normalized = normalize(&py_to_host(value));
    json_to_py(py, &normalized)
}

/// Encode a parameter mapping to the canonical JSON text stored in presets
///
/// Each value is passed through the same normalization as `safe_serialize`
/// before encoding.
///
/// # Arguments
/// * `parameters` - Mapping of property or socket names to live values
///
/// # Returns
/// Compact JSON text suitable for a preset entry's parameter payload
///
/// # Raises
/// * TypeError - If a parameter key is not a string
#[pyfunction]
#[pyo3(signature = (parameters))]
fn encode_parameters(parameters: &Bound<'_, PyDict>) -> PyResult<String> {
    let mut snapshot = ParameterSnapshot::new();
    for (key, item) in parameters.iter() {
        let key: String = key
            .extract()
            .map_err(|_| PyTypeError::new_err("parameter keys must be strings"))?;
        snapshot.insert(key, normalize(&py_to_host(&item)));
    }
    Ok(snapshot.to_json())
}

/// Decode preset parameter text into a dictionary
///
/// Decoding is tolerant: malformed JSON or a non-object payload yields an
/// empty dictionary rather than raising.
///
/// # Arguments
/// * `text` - Parameter JSON text from a preset entry
///
/// # Returns
/// Dictionary of parameter names to stored values
#[pyfunction]
#[pyo3(signature = (text))]
fn decode_parameters(py: Python<'_>, text: &str) -> PyResult<PyObject> {
    let snapshot = ParameterSnapshot::from_json_lossy(text);
    let dict = PyDict::new(py);
    for (key, value) in snapshot.iter() {
        dict.set_item(key.as_str(), json_to_py(py, value)?)?;
    }
    Ok(dict.into())
}

/// Load one preset slot from a preset document
///
/// # Arguments
/// * `path` - Path of the preset JSON document
/// * `slot` - Slot name, e.g. "Preset1"
///
/// # Returns
/// Dictionary with the slot's "Preference" and "ModSet" sections. A missing
/// file or slot yields the default empty set.
///
/// # Raises
/// * StoreError - If the document exists but cannot be read
#[pyfunction]
#[pyo3(signature = (path, slot))]
fn load_preset_set(py: Python<'_>, path: &str, slot: &str) -> PyResult<PyObject> {
    let store = PresetStore::new(LocalFileStorage::new(), path);
    let set = store.load_or_default(slot).map_err(convert_error)?;
    let value = serde_json::to_value(&set).map_err(|err| convert_error(err.into()))?;
    json_to_py(py, &value)
}

/// Save one preset slot into a preset document
///
/// Other slots in the document are preserved; only the named slot is
/// replaced.
///
/// # Arguments
/// * `path` - Path of the preset JSON document
/// * `slot` - Slot name to write
/// * `data` - Dictionary with "Preference" and "ModSet" sections
///
/// # Raises
/// * ValidationError - If the dictionary does not describe a preset set
/// * StoreError - If the document cannot be written
#[pyfunction]
#[pyo3(signature = (path, slot, data))]
fn save_preset_set(path: &str, slot: &str, data: &Bound<'_, PyDict>) -> PyResult<()> {
    let value = normalize(&py_to_host(data.as_any()));
    let set: PresetSet = serde_json::from_value(value)
        .map_err(|err| PyValidationError::new_err(format!("Invalid preset set: {err}")))?;
    let store = PresetStore::new(LocalFileStorage::new(), path);
    store.save(slot, &set).map_err(convert_error)
}

/// List the slot names present in a preset document, in document order
///
/// # Arguments
/// * `path` - Path of the preset JSON document
///
/// # Returns
/// List of slot names; empty if the document is missing or malformed
#[pyfunction]
#[pyo3(signature = (path))]
fn list_slots(path: &str) -> PyResult<Vec<String>> {
    let store = PresetStore::new(LocalFileStorage::new(), path);
    store.slots().map_err(convert_error)
}

/// Remove a slot from a preset document
///
/// # Arguments
/// * `path` - Path of the preset JSON document
/// * `slot` - Slot name to remove
///
/// # Returns
/// True if the slot was present and removed, False if it was absent
#[pyfunction]
#[pyo3(signature = (path, slot))]
fn delete_slot(path: &str, slot: &str) -> PyResult<bool> {
    let store = PresetStore::new(LocalFileStorage::new(), path);
    store.delete_slot(slot).map_err(convert_error)
}

/// Check whether a preset document exists at the given path
#[pyfunction]
#[pyo3(signature = (path))]
fn preset_file_exists(path: &str) -> bool {
    PresetStore::new(LocalFileStorage::new(), path).exists()
}

/// Icon identifier for a modifier kind, with a generic fallback
#[pyfunction]
#[pyo3(signature = (kind))]
fn icon_for(kind: &str) -> &'static str {
    modset_core::icon_for(kind)
}

/// Python module definition
#[pymodule]
fn modset(m: &Bound<'_, PyModule>) -> PyResult<()> {
    // Add main functions
    m.add_function(wrap_pyfunction!(safe_serialize, m)?)?;
    m.add_function(wrap_pyfunction!(encode_parameters, m)?)?;
    m.add_function(wrap_pyfunction!(decode_parameters, m)?)?;
    m.add_function(wrap_pyfunction!(load_preset_set, m)?)?;
    m.add_function(wrap_pyfunction!(save_preset_set, m)?)?;
    m.add_function(wrap_pyfunction!(list_slots, m)?)?;
    m.add_function(wrap_pyfunction!(delete_slot, m)?)?;
    m.add_function(wrap_pyfunction!(preset_file_exists, m)?)?;
    m.add_function(wrap_pyfunction!(icon_for, m)?)?;

    // Add custom exception classes
    m.add("ModSetError", m.py().get_type::<PyModSetError>())?;
    m.add("StoreError", m.py().get_type::<PyStoreError>())?;
    m.add("ValidationError", m.py().get_type::<PyValidationError>())?;

    // Add version info
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;
    m.add(
        "__doc__",
        "Modifier preset capture, storage and restore for Python-hosted tools",
    )?;

    Ok(())
}
