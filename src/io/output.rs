//! About the output files.
use std::fs;
use std::fs::File;
use std::io::Write;
use crate::common::error::*;
use crate::pimd::traits::RingComm;
use ndarray::Array1;





/// Specify the output path for the output files
///
/// # Parameters
/// ```
/// ring: the ring transport
/// index: the input index that specifies where to output the files
/// output_path: the path for the output files
/// ```
pub fn create_output_path<R: RingComm>(ring: &R, index: Option<usize>) -> String
{
    match index
    {
        // If index exists, create a directory and output the files to it
        Some(index) =>
        {
            if ring.universe_rank() == 0
            {
                let dir: String = format!("{}", index);
                let dir_exist = fs::metadata(&dir);
                // If the directory already exist, do nothing; otherwise, create the directory
                match dir_exist
                {
                    Ok(_) => (),
                    Err(_) => fs::create_dir(&dir).expect(&error_dir("creating", &dir)),
                }
            }

            format!("{}/", index)
        },

        // If index non-exists, output the files to the current directory
        None =>
        {
            String::new()
        },
    }
}





/// The fixed-column diagnostics log, written by the root process only. One
/// row per step carries the thirteen estimator outputs of the propagator.
pub struct DiagnosticsLog
{
    pub filename: String,
}





impl DiagnosticsLog
{
    /// Create the log file and write the column header
    pub fn create<R: RingComm>(ring: &R, output_path: &str) -> Self
    {
        let filename: String = format!("{}pimd.out", output_path);
        if ring.universe_rank() == 0
        {
            let mut output = File::create(&filename).expect(&error_file("creating", &filename));
            output.write_all(b"  step            time         ke_bead        e_spring           pot_e           tot_e          t_prim           t_vir            t_cv          p_prim            p_md            p_cv              vw         ke_baro        enthalpy\n").expect(&error_file("writing", &filename));
        }

        DiagnosticsLog
        {
            filename,
        }
    }

    /// Append one diagnostics row for the current step
    ///
    /// # Parameters
    /// ```
    /// step: the current timestep number
    /// time: the elapsed simulation time (Unit: fs)
    /// diag: the fixed-order diagnostics vector of the propagator
    /// ```
    pub fn append<R: RingComm>(&self, ring: &R, step: usize, time: f64, diag: &Array1<f64>)
    {
        if ring.universe_rank() == 0
        {
            let mut output = File::options().append(true).open(&self.filename).expect(&error_file("opening", &self.filename));
            let mut row: String = format!("{:6} {:15.8}", step, time);
            for value in diag.iter()
            {
                row += &format!(" {:15.8}", value);
            }
            row += "\n";
            output.write_all(row.as_bytes()).expect(&error_file("writing", &self.filename));
        }
    }
}










#[cfg(test)]
mod tests
{
    use super::*;
    use crate::pimd::channel::ChannelRing;
    use ndarray::Array1;

    #[test]
    fn missing_index_keeps_the_current_directory()
    {
        let rings: Vec<ChannelRing> = ChannelRing::create(1);
        assert_eq!(create_output_path(&rings[0], None), String::new());
    }

    #[test]
    fn diagnostics_rows_land_under_the_header()
    {
        let rings: Vec<ChannelRing> = ChannelRing::create(1);
        let ring: &ChannelRing = &rings[0];
        let output_path: String = format!("{}/", std::env::temp_dir().display());

        let log: DiagnosticsLog = DiagnosticsLog::create(ring, &output_path);
        let diag: Array1<f64> = Array1::zeros(13);
        log.append(ring, 1, 0.5, &diag);
        log.append(ring, 2, 1.0, &diag);

        let content: String = fs::read_to_string(&log.filename).expect(&error_file("reading", &log.filename));
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("e_spring"));
        assert!(lines[1].trim_start().starts_with('1'));
        assert_eq!(lines[1].split_whitespace().count(), 15);
    }
}




