use crate::f;

/// Extends primitives with C-style scientific formatting
pub trait FloatExt {
    /// Scientific number formatting with a signed, padded exponent
    ///
    /// Rust prints `1e0` where C prints `1.000e+00`, and FFEA tools read and
    /// write the C form. This gives the `%.Ne` layout for any precision and
    /// minimum exponent width.
    ///
    /// Works for anything that can be represented as scientific using the
    /// `LowerExp` trait, which is pretty much every numerical primitive.
    ///
    /// ```rust
    /// # use ffeatools_utils::FloatExt;
    /// // equivalent of "%6.3e"
    /// assert_eq!((-1.0_f64).sci(3, 2), "-1.000e+00".to_string());
    /// assert_eq!((0.00125_f64).sci(3, 2), "1.250e-03".to_string());
    /// // equivalent of "%le"
    /// assert_eq!((42.0_f64).sci(6, 2), "4.200000e+01".to_string());
    /// ```
    ///
    /// FFEA node and stokes files use six digits and a two digit exponent,
    /// while material files and comparison tables are narrower.
    ///
    /// ```rust
    /// # use ffeatools_utils::FloatExt;
    /// let node = [0.0_f64, 1.5e-9, -2.0e-10].map(|v| v.sci(6, 2)).join(" ");
    /// assert_eq!(node, "0.000000e+00 1.500000e-09 -2.000000e-10");
    ///
    /// let radius = 5e-10_f64;
    /// assert_eq!(format!("{:>14}", radius.sci(6, 2)), "  5.000000e-10");
    ///
    /// // bulk modulus column of a material file
    /// assert_eq!(1.11e9_f64.sci(6, 2), "1.110000e+09");
    /// ```
    fn sci(&self, precision: usize, exp_pad: usize) -> String;
}

impl<T: std::fmt::LowerExp> FloatExt for T {
    fn sci(&self, precision: usize, exp_pad: usize) -> String {
        let mut num = f!("{:.precision$e}", &self, precision = precision);
        let exp = match num.find('e') {
            Some(i) => num.split_off(i),
            None => return num,
        };
        // Make sure the exponent is signed
        let (sign, exp) = match exp.strip_prefix("e-") {
            Some(exp) => ('-', exp),
            None => ('+', &exp[1..]),
        };
        // Pad the exponent with zeros if needed and put it back on the number
        num.push_str(&f!("e{}{:0>pad$}", sign, exp, pad = exp_pad));
        num
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exponent_width() {
        assert_eq!(1.0e-100_f64.sci(2, 2), "1.00e-100");
        assert_eq!(6.02e23_f64.sci(3, 3), "6.020e+023");
        assert_eq!(0.0_f32.sci(1, 2), "0.0e+00");
    }
}
