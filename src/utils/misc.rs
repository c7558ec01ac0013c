use crate::types::header::ConfigOption;

/// Name of the coincidence table for a material and source distance (cm)
pub fn coincidence_table_name(material: &str, source_distance_cm: f64) -> String {
    format!("coincidence_{material}_src{source_distance_cm:.1}cm.csv")
}

/// Common stem of the `.cdf`/`.cdh` pair produced for one run
pub fn output_prefix(material: &str, source_distance_cm: f64, option: ConfigOption) -> String {
    format!("coincidence_{material}_src{source_distance_cm:.1}cm_{option}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_use_one_decimal() {
        assert_eq!(coincidence_table_name("LXe", 25.0), "coincidence_LXe_src25.0cm.csv");
        assert_eq!(coincidence_table_name("LYSO", 12.5), "coincidence_LYSO_src12.5cm.csv");
        assert_eq!(
            output_prefix("LXe", 0.0, ConfigOption::SuperFine),
            "coincidence_LXe_src0.0cm_super_fine"
        );
    }
}
