/// Size of an encoded measurement: ten big-endian `f32` fields.
pub const MEASUREMENT_LEN: usize = 40;

/// SPS30 measurement values.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MeasurementRecord {
    /// Mass Concentration PM1.0 [μg/m³]
    pub mass_pm1_0: f32,
    /// Mass Concentration PM2.5 [μg/m³]
    pub mass_pm2_5: f32,
    /// Mass Concentration PM4.0 [μg/m³]
    pub mass_pm4_0: f32,
    /// Mass Concentration PM10 [μg/m³]
    pub mass_pm10_0: f32,
    /// Number Concentration PM0.5 [#/cm³]
    pub number_pm0_5: f32,
    /// Number Concentration PM1.0 [#/cm³]
    pub number_pm1_0: f32,
    /// Number Concentration PM2.5 [#/cm³]
    pub number_pm2_5: f32,
    /// Number Concentration PM4.0 [#/cm³]
    pub number_pm4_0: f32,
    /// Number Concentration PM10 [#/cm³]
    pub number_pm10_0: f32,
    /// Typical Particle Size [μm]
    pub typical_particle_size: f32,
}

impl MeasurementRecord {
    /// Decodes the sensor's wire layout. Fields are read at fixed offsets,
    /// most significant byte first.
    pub fn from_be_bytes(bytes: &[u8; MEASUREMENT_LEN]) -> Self {
        let field = |index: usize| {
            let offset = index * 4;
            f32::from_be_bytes([
                bytes[offset],
                bytes[offset + 1],
                bytes[offset + 2],
                bytes[offset + 3],
            ])
        };

        Self {
            mass_pm1_0: field(0),
            mass_pm2_5: field(1),
            mass_pm4_0: field(2),
            mass_pm10_0: field(3),
            number_pm0_5: field(4),
            number_pm1_0: field(5),
            number_pm2_5: field(6),
            number_pm4_0: field(7),
            number_pm10_0: field(8),
            typical_particle_size: field(9),
        }
    }

    /// Encodes the record in the sensor's wire layout.
    pub fn to_be_bytes(&self) -> [u8; MEASUREMENT_LEN] {
        let mut out = [0u8; MEASUREMENT_LEN];
        for (chunk, value) in out.chunks_exact_mut(4).zip(self.fields()) {
            chunk.copy_from_slice(&value.to_be_bytes());
        }
        out
    }

    /// Mass concentrations PM1.0, PM2.5, PM4.0, PM10.
    pub fn mass_concentrations(&self) -> [f32; 4] {
        [
            self.mass_pm1_0,
            self.mass_pm2_5,
            self.mass_pm4_0,
            self.mass_pm10_0,
        ]
    }

    /// Number concentrations PM0.5, PM1.0, PM2.5, PM4.0, PM10.
    pub fn number_concentrations(&self) -> [f32; 5] {
        [
            self.number_pm0_5,
            self.number_pm1_0,
            self.number_pm2_5,
            self.number_pm4_0,
            self.number_pm10_0,
        ]
    }

    /// All ten values in wire order.
    pub fn fields(&self) -> [f32; 10] {
        let [m1, m2, m3, m4] = self.mass_concentrations();
        let [n1, n2, n3, n4, n5] = self.number_concentrations();
        [m1, m2, m3, m4, n1, n2, n3, n4, n5, self.typical_particle_size]
    }
}

#[cfg(test)]
pub(crate) fn sample_record() -> MeasurementRecord {
    MeasurementRecord {
        mass_pm1_0: 1.5,
        mass_pm2_5: 2.25,
        mass_pm4_0: 3.0,
        mass_pm10_0: 4.125,
        number_pm0_5: 10.0,
        number_pm1_0: 12.5,
        number_pm2_5: 13.0,
        number_pm4_0: 13.25,
        number_pm10_0: 13.5,
        typical_particle_size: 0.625,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_big_endian_fields() {
        let mut bytes = [0u8; MEASUREMENT_LEN];
        // 1.0f32 = 0x3F800000, 2.5f32 = 0x40200000
        bytes[0..4].copy_from_slice(&[0x3f, 0x80, 0x00, 0x00]);
        bytes[36..40].copy_from_slice(&[0x40, 0x20, 0x00, 0x00]);

        let record = MeasurementRecord::from_be_bytes(&bytes);
        assert_eq!(record.mass_pm1_0, 1.0);
        assert_eq!(record.mass_pm2_5, 0.0);
        assert_eq!(record.typical_particle_size, 2.5);
    }

    #[test]
    fn field_order() {
        let record = sample_record();
        let decoded = MeasurementRecord::from_be_bytes(&record.to_be_bytes());
        assert_eq!(decoded, record);
        assert_eq!(decoded.mass_concentrations(), [1.5, 2.25, 3.0, 4.125]);
        assert_eq!(
            decoded.number_concentrations(),
            [10.0, 12.5, 13.0, 13.25, 13.5]
        );
    }
}
