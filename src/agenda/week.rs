use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};

/// The 7 calendar days, Sunday through Saturday, of the week containing the
/// reference date. Calendar-day arithmetic, so month/year boundaries and DST
/// days come out right.
pub fn dias_da_semana(referencia: NaiveDate) -> [NaiveDate; 7] {
    let indice = referencia.weekday().num_days_from_sunday() as i64;
    let domingo = referencia - Duration::days(indice);
    std::array::from_fn(|i| domingo + Duration::days(i as i64))
}

/// Inclusive timestamp bounds for a week-scoped query: Sunday 00:00:00
/// through Saturday 23:59:59.
pub fn intervalo_da_semana(referencia: NaiveDate) -> (NaiveDateTime, NaiveDateTime) {
    let dias = dias_da_semana(referencia);
    let inicio = dias[0].and_time(NaiveTime::MIN);
    let fim = dias[6]
        .and_hms_opt(23, 59, 59)
        .unwrap_or_else(|| dias[6].and_time(NaiveTime::MIN));
    (inicio, fim)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn seven_consecutive_days_starting_sunday() {
        // 2026-08-26 is a Wednesday
        let referencia = date(2026, 8, 26);
        let dias = dias_da_semana(referencia);

        assert_eq!(dias.len(), 7);
        assert_eq!(dias[0].weekday(), Weekday::Sun);
        assert!(dias[0] <= referencia);
        assert!(dias.contains(&referencia));
        for janela in dias.windows(2) {
            assert_eq!(janela[1] - janela[0], Duration::days(1));
        }
    }

    #[test]
    fn every_day_of_a_week_yields_the_same_week() {
        let esperado = dias_da_semana(date(2026, 8, 23));
        for dia in esperado {
            assert_eq!(dias_da_semana(dia), esperado);
        }
    }

    #[test]
    fn week_crosses_month_and_year_boundaries() {
        // 2026-01-01 is a Thursday; its week starts on 2025-12-28
        let dias = dias_da_semana(date(2026, 1, 1));
        assert_eq!(dias[0], date(2025, 12, 28));
        assert_eq!(dias[6], date(2026, 1, 3));
    }

    #[test]
    fn reference_on_sunday_is_the_week_start() {
        let domingo = date(2026, 8, 23);
        let dias = dias_da_semana(domingo);
        assert_eq!(dias[0], domingo);
        assert_eq!(dias[6], date(2026, 8, 29));
    }

    #[test]
    fn advancing_seven_days_shifts_the_week_start_by_seven() {
        let referencia = date(2026, 8, 26);
        let original = dias_da_semana(referencia);
        let avancada = dias_da_semana(referencia + Duration::days(7));
        assert_eq!(avancada[0] - original[0], Duration::days(7));
    }

    #[test]
    fn interval_spans_sunday_midnight_to_saturday_end() {
        let (inicio, fim) = intervalo_da_semana(date(2026, 8, 26));
        assert_eq!(inicio.to_string(), "2026-08-23 00:00:00");
        assert_eq!(fim.to_string(), "2026-08-29 23:59:59");
    }
}
