//! The nine entity descriptors.

use super::{EntityDescriptor as D, Entity, EnumChoice, FieldDescriptor as F};

const SEXO: &[EnumChoice] = &[EnumChoice::new("M", "Masculino"), EnumChoice::new("F", "Feminino")];

const STATUS_AGENDAMENTO: &[EnumChoice] = &[
    EnumChoice::new("pendente", "Pendente"),
    EnumChoice::new("confirmado", "Confirmado"),
    EnumChoice::new("cancelado", "Cancelado"),
    EnumChoice::new("realizado", "Realizado"),
];

pub static USUARIOS: D = D {
    entity: Entity::Usuarios,
    name: "usuarios",
    collection_path: "usuarios",
    title: "Usuários",
    display_field: Some("nome"),
    summary_fields: &["cpf", "email"],
    fields: &[
        F::text("nome", "Nome Completo").required(),
        F::text("cpf", "CPF").required().placeholder("Apenas números"),
        F::date("data_nascimento", "Data de Nascimento (AAAA-MM-DD)")
            .required()
            .placeholder("Ex: 1990-12-31"),
        F::choice("sexo", SEXO, "Sexo").required(),
        F::text("email", "Email").required().placeholder("exemplo@email.com"),
        F::text("telefone", "Telefone").placeholder("(XX) XXXXX-XXXX"),
    ],
};

pub static MEDICOS: D = D {
    entity: Entity::Medicos,
    name: "medicos",
    collection_path: "medicos",
    title: "Médicos",
    display_field: Some("nome"),
    summary_fields: &["especialidade", "crm", "email"],
    fields: &[
        F::text("nome", "Nome Completo").required().placeholder("Nome do médico"),
        F::text("cpf", "CPF").required().placeholder("Apenas números"),
        F::date("data_nascimento", "Data de Nascimento (AAAA-MM-DD)")
            .required()
            .placeholder("Ex: 1990-12-31"),
        F::choice("sexo", SEXO, "Sexo").required(),
        F::text("email", "Email").required().placeholder("exemplo@email.com"),
        F::text("telefone", "Telefone").placeholder("(XX) XXXXX-XXXX"),
        F::text("crm", "CRM").required().placeholder("CRM do médico"),
        F::text("especialidade", "Especialidade").placeholder("Ex: Cardiologia"),
    ],
};

pub static VACINAS: D = D {
    entity: Entity::Vacinas,
    name: "vacinas",
    collection_path: "vacinas",
    title: "Vacinas",
    display_field: Some("nome"),
    summary_fields: &["fabricante", "descricao", "doses_recomendadas"],
    fields: &[
        F::text("nome", "Nome da Vacina").required(),
        F::text("fabricante", "Fabricante").required(),
        F::text("descricao", "Descrição"),
        F::integer("doses_recomendadas", "Doses Recomendadas").required().placeholder("Ex: 1"),
    ],
};

pub static UNIDADES_SAUDE: D = D {
    entity: Entity::UnidadesSaude,
    name: "unidades-saude",
    collection_path: "unidades-saude",
    title: "Unidades de Saúde",
    display_field: Some("nome"),
    summary_fields: &["endereco", "telefone"],
    fields: &[
        F::text("nome", "Nome da Unidade").required().placeholder("Ex: Posto de Saúde Central"),
        F::text("endereco", "Endereço").required().placeholder("Rua, Número, Bairro, Cidade"),
        F::text("telefone", "Telefone").placeholder("(XX) XXXX-XXXX"),
    ],
};

pub static ESTOQUES_VACINA: D = D {
    entity: Entity::EstoquesVacina,
    name: "estoques-vacina",
    collection_path: "estoques-vacina",
    title: "Estoques de Vacina",
    display_field: None,
    summary_fields: &["quantidade_disponsivel"],
    fields: &[
        F::reference("vacina", Entity::Vacinas, "Vacina").required(),
        F::reference("unidade", Entity::UnidadesSaude, "Unidade de Saúde").required(),
        F::decimal("quantidade_disponsivel", "Quantidade Disponível")
            .required()
            .placeholder("Ex: 100.00"),
    ],
};

pub static AGENDAMENTOS: D = D {
    entity: Entity::Agendamentos,
    name: "agendamentos",
    collection_path: "agendamentos",
    title: "Agendamentos",
    display_field: None,
    summary_fields: &["data_hora", "status"],
    fields: &[
        F::reference("usuario", Entity::Usuarios, "Usuário").required(),
        F::reference("vacina", Entity::Vacinas, "Vacina").required(),
        F::reference("unidade", Entity::UnidadesSaude, "Unidade de Saúde").required(),
        F::datetime("data_hora", "Data e Hora (AAAA-MM-DDTHH:MM)")
            .required()
            .placeholder("Ex: 2025-12-31T14:30"),
        F::choice("status", STATUS_AGENDAMENTO, "Status").required(),
    ],
};

pub static APLICACOES_VACINAIS: D = D {
    entity: Entity::AplicacoesVacinais,
    name: "aplicacoes-vacinais",
    collection_path: "aplicacoes-vacinais",
    title: "Aplicações de Vacina",
    display_field: None,
    summary_fields: &["dose", "data_aplicacao"],
    fields: &[
        F::reference("medico", Entity::Medicos, "Médico Aplicador").required(),
        F::reference("usuario", Entity::Usuarios, "Paciente (Usuário)").required(),
        F::reference("vacina", Entity::Vacinas, "Vacina Aplicada").required(),
        F::reference("unidade", Entity::UnidadesSaude, "Unidade de Saúde").required(),
        F::date("data_aplicacao", "Data da Aplicação (AAAA-MM-DD)")
            .required()
            .placeholder("Ex: 2025-12-31"),
        F::integer("dose", "Dose").required().placeholder("Ex: 1"),
    ],
};

pub static CAMPANHAS_VACINAIS: D = D {
    entity: Entity::CampanhasVacinais,
    name: "campanhas-vacinais",
    collection_path: "campanhas-vacinais",
    title: "Campanhas Vacinais",
    display_field: Some("nome"),
    summary_fields: &["descricao", "data_inicio", "data_fim"],
    fields: &[
        F::text("nome", "Nome da Campanha")
            .required()
            .placeholder("Ex: Campanha de Vacinação contra a Gripe"),
        F::text("descricao", "Descrição").placeholder("Breve descrição dos objetivos da campanha"),
        F::date("data_inicio", "Data de Início (AAAA-MM-DD)")
            .required()
            .placeholder("Ex: 2025-04-01"),
        F::date("data_fim", "Data de Fim (AAAA-MM-DD)").required().placeholder("Ex: 2025-05-31"),
    ],
};

pub static CAMPANHA_VACINAL_VACINA: D = D {
    entity: Entity::CampanhaVacinalVacina,
    name: "campanha-vacinal-vacina",
    collection_path: "campanha-vacinal-vacina",
    title: "Vínculos Campanha-Vacina",
    display_field: None,
    summary_fields: &[],
    fields: &[
        F::reference("campanha", Entity::CampanhasVacinais, "Campanha").required(),
        F::reference("vacina", Entity::Vacinas, "Vacina").required(),
    ],
};

/// Descriptor for an entity.
pub fn descriptor(entity: Entity) -> &'static D {
    match entity {
        Entity::Usuarios => &USUARIOS,
        Entity::Medicos => &MEDICOS,
        Entity::Vacinas => &VACINAS,
        Entity::UnidadesSaude => &UNIDADES_SAUDE,
        Entity::EstoquesVacina => &ESTOQUES_VACINA,
        Entity::Agendamentos => &AGENDAMENTOS,
        Entity::AplicacoesVacinais => &APLICACOES_VACINAIS,
        Entity::CampanhasVacinais => &CAMPANHAS_VACINAIS,
        Entity::CampanhaVacinalVacina => &CAMPANHA_VACINAL_VACINA,
    }
}
