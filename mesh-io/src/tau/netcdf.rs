use super::missing;
use super::Dataset;
use super::Variable;
use crate::Error;
use crate::ErrorKind;
use std::io;
use std::path::Path;

/// A netCDF file opened for reading.
pub struct NetCdfFile {
    file: netcdf::File,
}

fn read_error(name: &str, err: netcdf::error::Error) -> Error {
    Error::bad_record(name, err.to_string())
}

impl NetCdfFile {
    pub fn open(path: impl AsRef<Path>) -> Result<NetCdfFile, Error> {
        let file = netcdf::open(path).map_err(|err| {
            Error::from(ErrorKind::Io(io::Error::new(
                io::ErrorKind::Other,
                err.to_string(),
            )))
        })?;
        Ok(NetCdfFile { file })
    }

    fn variable(&self, name: &str) -> Result<(netcdf::Variable<'_>, Vec<usize>), Error> {
        let var = self.file.variable(name).ok_or_else(|| missing(name))?;
        let shape = var.dimensions().iter().map(|d| d.len()).collect();
        Ok((var, shape))
    }
}

impl Dataset for NetCdfFile {
    fn dimension_len(&self, name: &str) -> Result<usize, Error> {
        self.file
            .dimension(name)
            .map(|d| d.len())
            .ok_or_else(|| missing(name))
    }

    fn ints(&self, name: &str) -> Result<Variable<i64>, Error> {
        let (var, shape) = self.variable(name)?;
        let values = var
            .get_values::<i32, _>(..)
            .map_err(|err| read_error(name, err))?;
        Ok(Variable {
            shape,
            values: values.into_iter().map(i64::from).collect(),
        })
    }

    fn floats(&self, name: &str) -> Result<Variable<f64>, Error> {
        let (var, shape) = self.variable(name)?;
        let values = var
            .get_values::<f64, _>(..)
            .map_err(|err| read_error(name, err))?;
        Ok(Variable { shape, values })
    }
}
