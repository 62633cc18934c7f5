//! Initial page data. Static literals stand in for what a backend would return.

use crate::domain::churn::{AtRiskStudent, ForecastPoint, RiskPattern};
use crate::domain::class_session::{Achievement, ClassSession};
use crate::domain::integration::{ApiIntegration, EquipmentLoad};
use crate::domain::ledger::{Category, EntryStatus, LedgerEntry};
use crate::domain::notice::{Notice, NoticeKind};
use crate::domain::payment::{Payment, PaymentStatus};

/// Supplies the initial collection of a page.
pub trait SeedProvider<R> {
    fn seed(&self) -> Vec<R>;
}

impl<R, F> SeedProvider<R> for F
where
    F: Fn() -> Vec<R>,
{
    fn seed(&self) -> Vec<R> {
        self()
    }
}

pub fn class_sessions() -> Vec<ClassSession> {
    vec![
        ClassSession::new("1", "HIIT com Pesos", "08:00", "Carla", "45 min", "Avançado", "Força"),
        ClassSession::new("2", "Yoga Flow", "10:30", "Paulo", "60 min", "Intermediário", "Flexibilidade"),
        ClassSession::new("3", "Spinning Express", "17:45", "Amanda", "30 min", "Todos", "Cardio").completed(),
        ClassSession::new("4", "Boxe Funcional", "19:00", "Roberto", "50 min", "Intermediário", "Força"),
        ClassSession::new("5", "Pilates", "07:15", "Mariana", "45 min", "Iniciante", "Core"),
    ]
}

pub fn achievements() -> Vec<Achievement> {
    vec![
        Achievement::new("1", "5 Aulas", 5, 5),
        Achievement::new("2", "10 Aulas", 5, 10),
        Achievement::new("3", "30 Dias", 15, 30),
        Achievement::new("4", "CrossTraining", 2, 5),
        Achievement::new("5", "Madrugador", 3, 5),
        Achievement::new("6", "Sem Faltas", 2, 4),
    ]
}

pub fn payments() -> Vec<Payment> {
    vec![
        Payment::new("1", "Ana Silva", 120.0, "2024-05-20", PaymentStatus::Paid, "Premium", "PIX"),
        Payment::new("2", "Carlos Oliveira", 150.0, "2024-05-22", PaymentStatus::Overdue, "VIP", "Cartão"),
        Payment::new("3", "Marta Rocha", 90.0, "2024-05-25", PaymentStatus::Pending, "Basic", "Boleto"),
        Payment::new("4", "João Santos", 180.0, "2024-05-28", PaymentStatus::Pending, "Premium", "PIX"),
        Payment::new("5", "Lucia Mendes", 200.0, "2024-05-30", PaymentStatus::Paid, "VIP", "Cartão"),
    ]
}

pub fn ledger_entries() -> Vec<LedgerEntry> {
    use Category::{Expense, Income};
    use EntryStatus::{Paid, Pending};

    vec![
        LedgerEntry::new("1", "Mensalidade - Ana Silva", 150.0, "15/05/2024", Paid, Income),
        LedgerEntry::new("2", "Mensalidade - Carlos Oliveira", 150.0, "16/05/2024", Pending, Income),
        LedgerEntry::new("3", "Agua Mineral", 250.0, "10/05/2024", Paid, Expense),
        LedgerEntry::new("4", "Manutenção Esteira", 450.0, "05/05/2024", Paid, Expense),
        LedgerEntry::new("5", "Mensalidade - João Costa", 180.0, "18/05/2024", Paid, Income),
        LedgerEntry::new("6", "Mensalidade - Mariana Santos", 170.0, "12/05/2024", Paid, Income),
        LedgerEntry::new("7", "Material de Limpeza", 180.0, "08/05/2024", Paid, Expense),
        LedgerEntry::new("8", "Mensalidade - Pedro Oliveira", 150.0, "19/05/2024", Pending, Income),
    ]
}

pub fn notices() -> Vec<Notice> {
    vec![
        Notice::new("1", NoticeKind::Critical, "RISCO DE CANCELAMENTO", "Joana Silva (5 faltas seguidas)", "15/05", "Última presença: 15/05")
            .with_chance("92% chance de evasão")
            .with_actions(&["Mensagem Personalizada", "Oferecer 10% Desconto"]),
        Notice::new("2", NoticeKind::Warning, "PAGAMENTO ATRASADO", "Carlos Oliveira: R$ 150 (3 dias)", "16/05", "Método: Pix")
            .with_actions(&["Lembrar por WhatsApp", "Enviar Boleto"]),
        Notice::new("3", NoticeKind::Info, "BACKUP CONCLUÍDO", "16/05 às 02:00", "16/05", "1.2GB de dados seguros")
            .with_actions(&["Marcar como Lida"]),
        Notice::new("4", NoticeKind::Critical, "ALUNO INATIVO", "Pedro Santos (sem acesso há 15 dias)", "14/05", "Último login: 01/05")
            .with_chance("78% chance de evasão")
            .with_actions(&["Entrar em Contato", "Oferecer Aula Grátis"]),
        Notice::new("5", NoticeKind::Warning, "CAPACIDADE MÁXIMA", "Turma de 19h: 95% ocupada", "13/05", "Considere abrir novo horário")
            .with_actions(&["Analisar Horários", "Ignorar"]),
    ]
}

pub fn at_risk_students() -> Vec<AtRiskStudent> {
    vec![
        AtRiskStudent::new("1", "Ana Silva", 85, RiskPattern::Attendance, "Faltou 5 vezes nas últimas 2 semanas"),
        AtRiskStudent::new("2", "João Pereira", 72, RiskPattern::Payment, "Atrasou pagamento por 7 dias"),
        AtRiskStudent::new("3", "Maria Oliveira", 68, RiskPattern::Feedback, "Avaliou treino recente com 2/5 estrelas"),
        AtRiskStudent::new("4", "Carlos Santos", 65, RiskPattern::Attendance, "Frequência irregular nos últimos 20 dias"),
        AtRiskStudent::new("5", "Lúcia Ferreira", 60, RiskPattern::Feedback, "Reclamou do horário das aulas 2 vezes"),
    ]
}

/// Cancellation history followed by the forecast for the coming days.
pub fn churn_forecast() -> Vec<ForecastPoint> {
    let history = [
        ("01/05", 3, 3), ("02/05", 2, 2), ("03/05", 5, 4), ("04/05", 4, 5), ("05/05", 3, 4),
        ("06/05", 2, 3), ("07/05", 1, 2), ("08/05", 3, 3), ("09/05", 4, 3), ("10/05", 6, 5),
        ("11/05", 5, 6), ("12/05", 4, 5), ("13/05", 3, 4), ("14/05", 5, 5),
    ];
    let ahead = [("15/05", 4), ("16/05", 3), ("17/05", 5), ("18/05", 4), ("19/05", 3), ("20/05", 2)];

    history
        .iter()
        .map(|(date, cancellations, forecast)| ForecastPoint {
            date: date.to_string(),
            cancellations: Some(*cancellations),
            forecast: *forecast,
        })
        .chain(ahead.iter().map(|(date, forecast)| ForecastPoint {
            date: date.to_string(),
            cancellations: None,
            forecast: *forecast,
        }))
        .collect()
}

pub fn api_integrations() -> Vec<ApiIntegration> {
    vec![
        ApiIntegration::new("members", "SAP FitnessPro", "98% concluída", 98, "Sincronização de Membros"),
        ApiIntegration::new("schedule", "Google Calendar", "2 min atrás", 100, "Gestão de Horários"),
        ApiIntegration::new("payments", "PagSeguro", "R$ 2.340,00 (5 mins atrás)", 100, "Gateway Financeiro"),
    ]
}

pub fn equipment_loads() -> Vec<EquipmentLoad> {
    vec![
        EquipmentLoad::new("Esteiras", 70.0),
        EquipmentLoad::new("Halteres", 30.0),
        EquipmentLoad::new("Bicicletas", 90.0),
    ]
}
