/// Статические метаданные usecase'а (индекс, имя, описание для UI)
pub trait UseCaseMetadata {
    /// Индекс usecase'а в системе (например, "u501")
    fn usecase_index() -> &'static str;

    /// Машинное имя (snake_case)
    fn usecase_name() -> &'static str;

    /// Отображаемое имя для UI
    fn display_name() -> &'static str;

    /// Краткое описание
    fn description() -> &'static str;
}
