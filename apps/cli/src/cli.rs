//! Command line surface.
//!
//! # Usage
//!
//! ```bash
//! # Interactive shell (asks for the PIN)
//! fiado
//!
//! # One-shot commands (PIN from --pin or FIADO_ACCESS_PIN, else prompted)
//! fiado --pin 1540 painel
//! fiado catalogo listar --busca arroz
//! fiado catalogo vender 3
//! fiado estoque novo --nome "Café 500g" --categoria Bebidas --preco 18,90 --estoque 12
//! fiado clientes pagar c1 12,50
//! fiado clientes mensagem c2 --item 1:2 --item 5
//! fiado insights
//! fiado config backup --pasta ~/backups
//! fiado --yes config resetar
//! ```
//!
//! The same subcommands are typed at the shell prompt, without `fiado`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::commands::customer::DEFAULT_HISTORY_LIMIT;
use crate::commands::product::ProductInput;

#[derive(Parser, Debug)]
#[command(name = "fiado")]
#[command(version, about = "Caixa, estoque e caderno de fiado da mercearia")]
pub struct Cli {
    /// PIN de acesso para comandos avulsos
    #[arg(long, env = "FIADO_ACCESS_PIN", hide_env_values = true, global = true)]
    pub pin: Option<String>,

    /// Confirma ações destrutivas sem perguntar
    #[arg(short = 'y', long, global = true)]
    pub yes: bool,

    /// Imprime a resposta em JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Arquivo do banco de dados (padrão: FIADO_DB_PATH ou pasta do sistema)
    #[arg(long, value_name = "ARQUIVO", global = true)]
    pub db: Option<PathBuf>,

    /// Sem subcomando, abre o shell interativo
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// One line typed at the shell prompt.
#[derive(Parser, Debug)]
#[command(name = "fiado", no_binary_name = true, disable_version_flag = true)]
pub struct ShellLine {
    /// Confirma ações destrutivas sem perguntar
    #[arg(short = 'y', long, global = true)]
    pub yes: bool,

    /// Imprime a resposta em JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: ShellCommand,
}

#[derive(Subcommand, Debug)]
pub enum ShellCommand {
    #[command(flatten)]
    App(Command),

    /// Encerra a sessão (pede o PIN de novo)
    Sair,

    /// Fecha o programa
    #[command(alias = "exit", alias = "quit")]
    Fechar,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Resumo: a receber, recebido, estoque baixo, maiores devedores
    Painel,

    /// Catálogo de vendas
    Catalogo {
        #[command(subcommand)]
        action: CatalogAction,
    },

    /// Gestão de estoque
    Estoque {
        #[command(subcommand)]
        action: StockAction,
    },

    /// Caderno de fiado
    Clientes {
        #[command(subcommand)]
        action: CustomerAction,
    },

    /// Sugestões geradas por IA
    Insights {
        /// Mostra a última lista em vez de gerar outra
        #[arg(long)]
        ultimos: bool,
    },

    /// Backup, reset e diagnóstico
    Config {
        #[command(subcommand)]
        action: SettingsAction,
    },

    /// Abre o shell interativo
    Shell,
}

#[derive(Subcommand, Debug)]
pub enum CatalogAction {
    /// Lista produtos por nome e categoria
    Listar {
        /// Trecho do nome
        #[arg(short, long, default_value = "")]
        busca: String,

        /// Categoria ("Todos" para todas)
        #[arg(short, long, default_value = fiado_core::ALL_CATEGORIES)]
        categoria: String,
    },

    /// Lista as categorias
    Categorias,

    /// Vende uma unidade
    Vender {
        /// ID do produto
        id: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum StockAction {
    /// Lista produtos por nome ou categoria
    Listar {
        /// Trecho do nome ou da categoria
        #[arg(short, long, default_value = "")]
        busca: String,
    },

    /// Cadastra um produto
    Novo(ProductArgs),

    /// Altera os campos informados
    Editar {
        /// ID do produto
        id: String,

        #[command(flatten)]
        fields: ProductArgs,
    },

    /// Exclui um produto (pede confirmação)
    Excluir {
        /// ID do produto
        id: String,
    },
}

/// Product form fields.
#[derive(Args, Debug, Default)]
pub struct ProductArgs {
    #[arg(long)]
    pub nome: Option<String>,

    #[arg(long)]
    pub categoria: Option<String>,

    #[arg(long)]
    pub descricao: Option<String>,

    /// URL da imagem
    #[arg(long)]
    pub imagem: Option<String>,

    /// Preço de venda (ex.: 12,50)
    #[arg(long)]
    pub preco: Option<String>,

    /// Preço de custo (ex.: 8,90)
    #[arg(long)]
    pub custo: Option<String>,

    #[arg(long, allow_hyphen_values = true)]
    pub estoque: Option<i64>,

    /// Unidade (Unid, 5kg, 1L...)
    #[arg(long)]
    pub unidade: Option<String>,
}

impl From<ProductArgs> for ProductInput {
    fn from(args: ProductArgs) -> Self {
        ProductInput {
            name: args.nome,
            category: args.categoria,
            description: args.descricao,
            image: args.imagem,
            price: args.preco,
            cost: args.custo,
            stock: args.estoque,
            unit: args.unidade,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum CustomerAction {
    /// Lista clientes por nome ou telefone, maior saldo primeiro
    Listar {
        #[arg(short, long, default_value = "")]
        busca: String,
    },

    /// Cadastra um cliente
    Novo {
        /// Nome completo
        nome: String,

        #[arg(short, long, default_value = "")]
        telefone: String,
    },

    /// Registra um pagamento (VISTA)
    Pagar {
        /// ID do cliente
        id: String,

        /// Valor (ex.: 12,50)
        #[arg(allow_hyphen_values = true)]
        valor: String,
    },

    /// Registra uma nova compra fiado (FIADO)
    Fiar {
        /// ID do cliente
        id: String,

        /// Valor (ex.: 12,50)
        #[arg(allow_hyphen_values = true)]
        valor: String,
    },

    /// Últimos lançamentos
    Historico {
        /// ID do cliente
        id: String,

        #[arg(short = 'n', long, default_value_t = DEFAULT_HISTORY_LIMIT)]
        limite: usize,
    },

    /// Monta a mensagem de WhatsApp (saldo ou recibo)
    Mensagem {
        /// ID do cliente
        id: String,

        /// Item do recibo: <id do produto>[:quantidade]
        #[arg(short, long = "item")]
        itens: Vec<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum SettingsAction {
    /// Exporta produtos e clientes para um arquivo JSON
    Backup {
        /// Pasta de destino (padrão: FIADO_BACKUP_DIR ou pasta atual)
        #[arg(long)]
        pasta: Option<PathBuf>,
    },

    /// Apaga tudo e volta aos dados iniciais (pede confirmação)
    Resetar,

    /// Banco de dados, documentos salvos e configuração da IA
    Status,
}
