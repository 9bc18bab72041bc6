//! About the warning and error information when an interrupt occurs at running time.










/// Error message for File reading, creating, opening, and writing.
pub fn error_file(operation: &str, filename: &str) -> String
{
    format!("\n\n\n ERROR: There is some problem in {} the file '{}'. \n\n\n", operation, filename)
}

/// Error message for Directory creating
pub fn error_dir(operation: &str, dir: &str) -> String
{
    format!("\n\n\n ERROR: There is some problem in {} the directory '{}'. Maybe it already exists or you have no permission. \n\n\n", operation, dir)
}





/// Error message for an unknown configuration keyword
pub fn error_keyword(variable: &str, illegal_value: &str) -> String
{
    format!("\n\n\n ERROR: Illegal '{}' keyword '{}' has been read from the input parameters. Please check it. \n\n\n", variable, illegal_value)
}

/// Error message for a numeric configuration parameter out of its valid domain
pub fn error_out_of_range(variable: &str, value: f64) -> String
{
    format!("\n\n\n ERROR: Invalid value '{}' for the input parameter '{}', which is out of its valid range. Please check it. \n\n\n", value, variable)
}





/// Error message for as_slice() and as_slice_mut()
pub fn error_as_slice(variable: &str) -> String
{
    format!("\n\n\n ERROR: There is some problem in getting the slice of the variable '{}'. \n\n\n", variable)
}

/// Error message for `Some<A>`, Result<T, E>
pub fn error_none_value(variable: &str) -> String
{
    format!("\n\n\n ERROR: There is some problem with variable '{}', which has none/wrong value. \n\n\n", variable)
}





/// Error message for a resolved atom tag missing from the local tag map
pub fn error_tag_lookup(tag: i64) -> String
{
    format!("\n\n\n ERROR: There is some problem in locating the atom with tag '{}' in the local tag map. \n\n\n", tag)
}

/// Error message for sending or receiving through an in-process ring channel
pub fn error_channel(operation: &str, world: usize) -> String
{
    format!("\n\n\n ERROR: There is some problem in {} through the ring channel of world '{}'. \n\n\n", operation, world)
}

/// Error message for a ring topology whose process counts do not form equal worlds
pub fn error_ring_layout(nprocs: usize, nworlds: usize) -> String
{
    format!("\n\n\n ERROR: The {} processes cannot be divided into {} equal worlds. Please check the ring layout. \n\n\n", nprocs, nworlds)
}










